use clap::Parser;

/// An employer to scan: display name plus its HH identifier.
#[derive(Debug, Clone)]
pub struct EmployerSpec {
    pub name: String,
    pub hh_id: String,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hh-loader", about = "HeadHunter vacancy loader with salary reporting")]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Base URL of the HH API
    #[arg(long, env = "HH_BASE_URL", default_value = "https://api.hh.ru")]
    pub hh_base_url: String,

    /// Employer to scan as NAME=HH_ID; repeatable, replaces the built-in list
    #[arg(long = "employer", value_name = "NAME=HH_ID", value_parser = parse_employer)]
    pub employers: Vec<EmployerSpec>,

    /// Keyword for the vacancy search report
    #[arg(long, default_value = "Python")]
    pub keyword: String,
}

fn parse_employer(s: &str) -> Result<EmployerSpec, String> {
    let (name, hh_id) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=HH_ID, got '{s}'"))?;
    if name.is_empty() || hh_id.is_empty() {
        return Err(format!("expected NAME=HH_ID, got '{s}'"));
    }
    Ok(EmployerSpec {
        name: name.to_string(),
        hh_id: hh_id.to_string(),
    })
}

impl Config {
    /// Employers to process: the --employer flags, or the built-in list.
    pub fn resolved_employers(&self) -> Vec<EmployerSpec> {
        if !self.employers.is_empty() {
            return self.employers.clone();
        }
        [
            ("Сбербанк", "3529"),
            ("Тинькофф", "78638"),
            ("Авито", "84585"),
            ("ВТБ", "4181"),
            ("Альфа-Банк", "80"),
            ("Аэрофлот", "1373"),
            ("РЖД", "23427"),
            ("Газпром", "39305"),
            ("Озон", "2180"),
            ("Циан", "1429999"),
        ]
        .into_iter()
        .map(|(name, hh_id)| EmployerSpec {
            name: name.to_string(),
            hh_id: hh_id.to_string(),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::parse_employer;

    #[test]
    fn parses_name_and_id() {
        let spec = parse_employer("Озон=2180").unwrap();
        assert_eq!(spec.name, "Озон");
        assert_eq!(spec.hh_id, "2180");
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(parse_employer("no-separator").is_err());
        assert!(parse_employer("=123").is_err());
        assert!(parse_employer("Name=").is_err());
    }
}
