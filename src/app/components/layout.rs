//! Screen frame shared by every page.

use pingpong_wire::Agent;

const APP_NAME: &str = "PingPong Hub";
const RULE_WIDTH: usize = 60;

pub fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// Section heading with an optional right-hand note, e.g. `Players  (1/2 selected)`.
pub fn heading(title: &str, note: Option<&str>) -> String {
    match note {
        Some(note) if !note.is_empty() => format!("{}  ({})", title.to_uppercase(), note),
        _ => title.to_uppercase(),
    }
}

/// Wrap page sections with the header bar and separators.
pub fn layout(title: &str, agent: Option<&Agent>, sections: &[String]) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let mut out = Vec::with_capacity(sections.len() * 2 + 3);

    let signed_in = agent
        .map(|a| format!("  signed in as {} <{}>", a.full_name, a.email))
        .unwrap_or_default();
    out.push(format!("{} v{} · {}{}", APP_NAME, version, title, signed_in));
    out.push(rule());
    for section in sections.iter().filter(|s| !s.trim().is_empty()) {
        out.push(section.trim_end().to_string());
        out.push(rule());
    }
    out.join("\n")
}
