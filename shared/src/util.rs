/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 订单号前缀 (TV a la Carta)
pub const ORDER_ID_PREFIX: &str = "TVC";

const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 非负整数转大写 base36
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while value > 0 {
        buf.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

/// Generate a human-copyable order id.
///
/// Layout: `TVC-<millis in base36>-<5 random base36 chars>`, all uppercase.
/// The random suffix keeps ids distinct when two orders share a millisecond.
pub fn order_id(timestamp_millis: i64) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..36)] as char)
        .collect();
    format!(
        "{}-{}-{}",
        ORDER_ID_PREFIX,
        to_base36(timestamp_millis.max(0) as u64),
        suffix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_order_id_shape() {
        let id = order_id(1_700_000_000_000);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TVC");
        assert_eq!(parts[1], "LOYW3V28");
        assert_eq!(parts[2].len(), 5);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
