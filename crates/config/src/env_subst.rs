/// Replace `${ENV_VAR}` placeholders in raw config text.
///
/// Unresolvable or malformed placeholders are emitted verbatim.
pub fn substitute_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    },
                }
                rest = &after[end + 1..];
            },
            _ => {
                // "${}" or an unclosed "${..." — keep the literal text.
                out.push_str("${");
                rest = after;
            },
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
// set_var is unsafe in edition 2024; fine in single-purpose tests.
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_var() {
        unsafe { std::env::set_var("WASEND_TEST_VAR", "hello") };
        assert_eq!(substitute_env("token = \"${WASEND_TEST_VAR}\""), "token = \"hello\"");
        unsafe { std::env::remove_var("WASEND_TEST_VAR") };
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env("${WASEND_NONEXISTENT_XYZ}"),
            "${WASEND_NONEXISTENT_XYZ}"
        );
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }

    #[test]
    fn malformed_placeholders_pass_through() {
        assert_eq!(substitute_env("${}"), "${}");
        assert_eq!(substitute_env("tail ${UNCLOSED"), "tail ${UNCLOSED");
    }
}
