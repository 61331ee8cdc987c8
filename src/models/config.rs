use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency: String,
    pub country_code: String,
    pub urgent_window_days: u32,
    pub upcoming_limit: usize,
    pub default_advance_percent: u32,
    pub history_limit: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "LKR".to_string(),
            country_code: "94".to_string(),
            urgent_window_days: 2,
            upcoming_limit: 5,
            default_advance_percent: 50,
            history_limit: 10,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.currency.trim().is_empty() {
            return Err(anyhow::anyhow!("Currency cannot be empty"));
        }

        if self.country_code.is_empty() || !self.country_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(anyhow::anyhow!(
                "Country code must contain digits only (got '{}')",
                self.country_code
            ));
        }

        if !(10..=90).contains(&self.default_advance_percent)
            || self.default_advance_percent % 10 != 0
        {
            return Err(anyhow::anyhow!(
                "Default advance percent must be a multiple of 10 between 10 and 90"
            ));
        }

        if self.upcoming_limit == 0 {
            return Err(anyhow::anyhow!("Upcoming limit must be greater than 0"));
        }

        if self.history_limit == 0 {
            return Err(anyhow::anyhow!("History limit must be greater than 0"));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(anyhow::anyhow!(
                "Log level must be one of: {}",
                valid_levels.join(", ")
            ));
        }

        Ok(())
    }

    /// Apply a `key = value` pair given on the command line.
    pub fn set_value(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let parse_number = |v: &str| -> anyhow::Result<u64> {
            v.trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("'{}' expects a whole number, got '{}'", key, v))
        };

        match key {
            "currency" => self.currency = value.trim().to_uppercase(),
            "country_code" => self.country_code = value.trim().trim_start_matches('+').to_string(),
            "urgent_window_days" => self.urgent_window_days = parse_number(value)? as u32,
            "upcoming_limit" => self.upcoming_limit = parse_number(value)? as usize,
            "default_advance_percent" => self.default_advance_percent = parse_number(value)? as u32,
            "history_limit" => self.history_limit = parse_number(value)? as usize,
            "log_level" => self.log_level = value.trim().to_lowercase(),
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
        }

        self.validate()
    }
}
