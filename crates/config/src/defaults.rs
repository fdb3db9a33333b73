pub fn default_port() -> u16 {
    8080
}

pub fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}
