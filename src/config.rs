use std::env;

pub struct Config {
    pub database_url: String,
    /// Global payment switch. Off on self-hosted/dedicated installations;
    /// every billing-mode resolution short-circuits to `none` when off.
    pub enable_payment: bool,
    /// Base URL of the usage API. Unset on installations that run with
    /// payment disabled.
    pub usage_api_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok(); // Load .env file

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let enable_payment = env::var("ENABLE_PAYMENT")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let usage_api_url = env::var("USAGE_API_URL").ok();

        Config {
            database_url,
            enable_payment,
            usage_api_url,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn restore_env(vars: Vec<(&'static str, Option<String>)>) {
        for (key, value) in vars {
            if let Some(val) = value {
                env::set_var(key, val);
            } else {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn payment_flag_defaults_off_and_accepts_common_spellings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved = vec![
            ("DATABASE_URL", env::var("DATABASE_URL").ok()),
            ("ENABLE_PAYMENT", env::var("ENABLE_PAYMENT").ok()),
            ("USAGE_API_URL", env::var("USAGE_API_URL").ok()),
        ];

        env::set_var("DATABASE_URL", "postgres://localhost/nimbus_test");
        env::remove_var("USAGE_API_URL");

        env::remove_var("ENABLE_PAYMENT");
        assert!(!Config::from_env().enable_payment);

        env::set_var("ENABLE_PAYMENT", "true");
        assert!(Config::from_env().enable_payment);

        env::set_var("ENABLE_PAYMENT", "1");
        assert!(Config::from_env().enable_payment);

        env::set_var("ENABLE_PAYMENT", "off");
        let config = Config::from_env();
        assert!(!config.enable_payment);
        assert_eq!(config.usage_api_url, None);

        restore_env(saved);
    }
}
