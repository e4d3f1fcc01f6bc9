use uuid::Uuid;

use crate::error::{TaskError, TaskResult};

/// Normalizes user-entered task text. Empty or whitespace-only text is rejected.
pub fn normalize_text(raw: &str) -> TaskResult<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(TaskError::Validation("task text must not be empty".to_string()));
    }
    Ok(text.to_string())
}

/// Joins command line words into task text (`add Buy milk` -> "Buy milk").
pub fn join_words(args: &[String]) -> String {
    args.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a full id or a unique id prefix against `candidates`.
///
/// Hyphens are ignored and matching is case-insensitive, so both the
/// hyphenated UUID form and the short id shown in listings work.
pub fn expand_id(key: &str, candidates: &[Uuid]) -> TaskResult<Uuid> {
    let needle: String = key.trim().chars().filter(|c| *c != '-').collect::<String>().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(TaskError::NotFound(key.to_string()));
    }

    // 1. Exact match
    if let Ok(id) = Uuid::parse_str(&needle) {
        if candidates.contains(&id) {
            return Ok(id);
        }
        return Err(TaskError::NotFound(key.to_string()));
    }

    // 2. Prefix match
    let matches: Vec<Uuid> = candidates
        .iter()
        .filter(|c| c.simple().to_string().starts_with(&needle))
        .copied()
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(TaskError::NotFound(key.to_string())),
        n => Err(TaskError::AmbiguousId { prefix: key.to_string(), matches: n }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Buy milk ").unwrap(), "Buy milk");
        assert!(matches!(normalize_text(""), Err(TaskError::Validation(_))));
        assert!(matches!(normalize_text(" \t\n"), Err(TaskError::Validation(_))));
    }

    #[test]
    fn test_join_words() {
        let args = vec!["Buy".to_string(), " milk".to_string(), "".to_string()];
        assert_eq!(join_words(&args), "Buy milk");
        assert_eq!(join_words(&[]), "");
    }

    #[test]
    fn test_expand_id() {
        let a = id("aaaa1111-0000-4000-8000-000000000001");
        let b = id("aaaa2222-0000-4000-8000-000000000002");
        let c = id("bbbb1111-0000-4000-8000-000000000003");
        let candidates = vec![a, b, c];

        assert_eq!(expand_id("aaaa1", &candidates).unwrap(), a);
        assert_eq!(expand_id("AAAA2", &candidates).unwrap(), b);
        assert_eq!(expand_id("b", &candidates).unwrap(), c);
        assert_eq!(expand_id(&a.to_string(), &candidates).unwrap(), a);
        assert_eq!(expand_id(&a.simple().to_string(), &candidates).unwrap(), a);

        // Ambiguous
        assert!(matches!(
            expand_id("aaaa", &candidates),
            Err(TaskError::AmbiguousId { matches: 2, .. })
        ));

        // Unknown
        assert!(matches!(expand_id("c", &candidates), Err(TaskError::NotFound(_))));
        assert!(matches!(expand_id("", &candidates), Err(TaskError::NotFound(_))));
        let absent = id("cccc0000-0000-4000-8000-000000000000");
        assert!(matches!(expand_id(&absent.to_string(), &candidates), Err(TaskError::NotFound(_))));
    }
}
