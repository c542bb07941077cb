use std::{collections::HashMap, str::FromStr};

/// Snapshot of configuration variables (process environment, optionally
/// overlaid with a `.env` file) used to build runtime settings.
#[derive(Debug, Clone)]
pub struct EnvContext {
    vars: HashMap<String, String>,
}

impl EnvContext {
    pub fn new() -> Self {
        let mut vars = HashMap::new();

        // Load all system environment variables
        for (key, value) in std::env::vars() {
            vars.insert(key, value);
        }

        Self { vars }
    }

    pub fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parses `key` when present. `None` means the variable is unset.
    pub fn parse<T: FromStr>(&self, key: &str) -> Option<Result<T, T::Err>> {
        self.get(key).map(|v| v.parse::<T>())
    }

    pub fn set(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    pub fn merge(&mut self, vars: HashMap<String, String>) {
        self.vars.extend(vars);
    }
}

impl Default for EnvContext {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, String>> for EnvContext {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_context() {
        let mut ctx = EnvContext::empty();
        ctx.set("TEST_KEY".to_string(), "test_value".to_string());

        assert_eq!(ctx.get("TEST_KEY"), Some("test_value".to_string()));
        assert_eq!(ctx.get("MISSING"), None);
        assert_eq!(ctx.get_or("MISSING", "default"), "default");
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let mut ctx = EnvContext::empty();
        ctx.set("BLANK".to_string(), "   ".to_string());
        assert_eq!(ctx.get("BLANK"), None);
    }

    #[test]
    fn test_parse_and_merge() {
        let mut ctx = EnvContext::empty();
        ctx.merge(HashMap::from([
            ("SECS".to_string(), "60".to_string()),
            ("BAD".to_string(), "soon".to_string()),
        ]));

        assert_eq!(ctx.parse::<u64>("SECS"), Some(Ok(60)));
        assert!(matches!(ctx.parse::<u64>("BAD"), Some(Err(_))));
        assert!(ctx.parse::<u64>("MISSING").is_none());
    }
}
