//! Recipient normalization.

/// Domain appended to bare recipient identifiers.
pub const DOMAIN_SUFFIX: &str = "@s.whatsapp.net";

/// Normalize a bare recipient into a fully-qualified backend address.
///
/// Pure and total for any non-empty string, and appends the suffix exactly
/// once. Malformed identifiers pass through untouched; only the backend
/// rejects them.
pub fn to_jid(recipient: &str) -> String {
    if recipient.ends_with(DOMAIN_SUFFIX) {
        recipient.to_string()
    } else {
        format!("{recipient}{DOMAIN_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_domain_suffix() {
        assert_eq!(to_jid("15551234567"), "15551234567@s.whatsapp.net");
    }

    #[test]
    fn never_double_appends() {
        assert_eq!(
            to_jid("15551234567@s.whatsapp.net"),
            "15551234567@s.whatsapp.net"
        );
        assert_eq!(to_jid(&to_jid("15551234567")), to_jid("15551234567"));
    }

    #[test]
    fn malformed_identifiers_pass_through() {
        assert_eq!(to_jid("not a number"), "not a number@s.whatsapp.net");
    }
}
