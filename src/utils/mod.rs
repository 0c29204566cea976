/// Generate a JWT ID: 16 random bytes, hex encoded (32 chars)
pub fn generate_jti() -> String {
    let bytes: [u8; 16] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Generate a request correlation id for signed download/upload tokens
pub fn generate_unique_id() -> String {
    format!("wings_{}", uuid::Uuid::new_v4().simple())
}

/// Percent-encode a single query-string value
pub fn encode_query_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Trim trailing slashes from a base URL
pub fn trim_base_url(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}
