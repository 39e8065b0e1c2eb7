//! Module cache discovery.

use std::path::{Path, PathBuf};

/// Locates the module cache root.
///
/// Lookup order: an explicitly configured root, `GOMODCACHE`, the first
/// `GOPATH` entry followed by `pkg/mod`, then `$HOME/go/pkg/mod`. Empty
/// variables are ignored. `lookup` reads an environment variable; it is a
/// parameter so callers can resolve against something other than the
/// process environment.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use xref_go::resolve_cache_root;
///
/// let root = resolve_cache_root(None, |key| match key {
///     "GOPATH" => Some("/home/dev/go".into()),
///     _ => None,
/// });
/// assert_eq!(root, Some(PathBuf::from("/home/dev/go/pkg/mod")));
///
/// let explicit = resolve_cache_root(Some(Path::new("/cache")), |_| None);
/// assert_eq!(explicit, Some(PathBuf::from("/cache")));
/// ```
pub fn resolve_cache_root<F>(explicit: Option<&Path>, lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Some(root.to_path_buf());
    }

    let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(modcache) = var("GOMODCACHE") {
        return Some(PathBuf::from(modcache));
    }

    if let Some(gopath) = var("GOPATH")
        && let Some(first) = std::env::split_paths(&gopath).find(|p| !p.as_os_str().is_empty())
    {
        return Some(first.join("pkg").join("mod"));
    }

    var("HOME")
        .or_else(|| var("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("go").join("pkg").join("mod"))
}

/// Locates the module cache root from the process environment.
pub fn cache_root_from_env(explicit: Option<&Path>) -> Option<PathBuf> {
    let root = resolve_cache_root(explicit, |key| std::env::var(key).ok());
    match &root {
        Some(path) => tracing::info!("module cache root: {}", path.display()),
        None => tracing::warn!("module cache root could not be determined"),
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_root_wins() {
        let root = resolve_cache_root(
            Some(Path::new("/explicit")),
            env(&[("GOMODCACHE", "/modcache")]),
        );
        assert_eq!(root, Some(PathBuf::from("/explicit")));
    }

    #[test]
    fn test_empty_explicit_root_ignored() {
        let root = resolve_cache_root(Some(Path::new("")), env(&[("GOMODCACHE", "/modcache")]));
        assert_eq!(root, Some(PathBuf::from("/modcache")));
    }

    #[test]
    fn test_gomodcache_before_gopath() {
        let root = resolve_cache_root(
            None,
            env(&[("GOMODCACHE", "/modcache"), ("GOPATH", "/gopath")]),
        );
        assert_eq!(root, Some(PathBuf::from("/modcache")));
    }

    #[test]
    fn test_empty_gomodcache_falls_back_to_gopath() {
        let root = resolve_cache_root(None, env(&[("GOMODCACHE", ""), ("GOPATH", "/gopath")]));
        assert_eq!(root, Some(PathBuf::from("/gopath/pkg/mod")));
    }

    #[cfg(unix)]
    #[test]
    fn test_first_gopath_entry_used() {
        let root = resolve_cache_root(None, env(&[("GOPATH", "/first:/second")]));
        assert_eq!(root, Some(PathBuf::from("/first/pkg/mod")));
    }

    #[test]
    fn test_home_fallback() {
        let root = resolve_cache_root(None, env(&[("HOME", "/home/dev")]));
        assert_eq!(root, Some(PathBuf::from("/home/dev/go/pkg/mod")));
    }

    #[test]
    fn test_nothing_available() {
        assert_eq!(resolve_cache_root(None, env(&[])), None);
    }
}
