pub fn now_rfc3339() -> String {
    let datetime: chrono::DateTime<chrono::Utc> = std::time::SystemTime::now().into();
    datetime.to_rfc3339()
}
