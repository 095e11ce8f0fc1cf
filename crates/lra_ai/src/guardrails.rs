use lra_core::error::AppError;

/// Normalize the analyzer's target source against the indexed sources.
///
/// - missing, blank or the literal `None`/`null` means no target
/// - an exact name is kept
/// - a unique case-insensitive match is replaced by the canonical name
/// - anything else is rejected
pub fn resolve_target_source(
    raw: Option<&str>,
    available: &[String],
) -> Result<Option<String>, AppError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    if available.iter().any(|s| s == raw) {
        return Ok(Some(raw.to_string()));
    }

    let folded = raw.to_lowercase();
    let mut matches = available.iter().filter(|s| s.to_lowercase() == folded);
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(Some(only.clone())),
        _ => Err(
            AppError::new("AI_ANALYSIS_INVALID", "Analyzer named a source that is not indexed")
                .with_details(format!("target_source={raw}; available={}", available.join(", "))),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<String> {
        vec!["KVKK_Kanunu.pdf".to_string(), "Yonetmelik.pdf".to_string()]
    }

    #[test]
    fn blanks_and_none_mean_no_target() {
        for raw in [None, Some(""), Some("  "), Some("None"), Some("null")] {
            assert_eq!(resolve_target_source(raw, &sources()).unwrap(), None);
        }
    }

    #[test]
    fn exact_and_case_insensitive_matches_resolve() {
        assert_eq!(
            resolve_target_source(Some("KVKK_Kanunu.pdf"), &sources()).unwrap().as_deref(),
            Some("KVKK_Kanunu.pdf")
        );
        assert_eq!(
            resolve_target_source(Some("kvkk_kanunu.PDF"), &sources()).unwrap().as_deref(),
            Some("KVKK_Kanunu.pdf")
        );
    }

    #[test]
    fn unknown_source_is_rejected() {
        let err = resolve_target_source(Some("GDPR.pdf"), &sources()).unwrap_err();
        assert_eq!(err.code, "AI_ANALYSIS_INVALID");
    }
}
