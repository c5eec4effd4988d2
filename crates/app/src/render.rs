use common::ledger::{IdentityCache, Ledger};

/// Render a ledger as text, newest post first, resolving each author through `cache`
pub fn feed(ledger: &Ledger, cache: &IdentityCache, limit: Option<usize>) -> String {
    if ledger.is_empty() {
        return "No posts yet".to_string();
    }

    let rendered = ledger.render(cache);
    let shown = limit.unwrap_or(rendered.len()).min(rendered.len());

    rendered[..shown]
        .iter()
        .map(|entry| {
            let body = entry
                .post
                .content
                .lines()
                .map(|line| format!("  {}", line))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "{} ({}) [{}]\n{}",
                entry.identity.display_name,
                entry.author_tag(),
                entry.identity.avatar_ref,
                body
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
