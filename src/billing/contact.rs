/// Build a `https://wa.me/` link from a phone number as people type it.
///
/// Non-digits are dropped and a leading national `0` is replaced by
/// `country_code`. Returns `None` when no digits remain.
pub fn normalize_phone_to_whatsapp_url(phone: &str, country_code: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let normalized = match digits.strip_prefix('0') {
        Some(national) => format!("{}{}", country_code, national),
        None => digits,
    };

    Some(format!("https://wa.me/{}", normalized))
}
