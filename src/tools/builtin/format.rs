//! Compact text renderings of API records for tool responses.

use std::fmt::Write;

use crate::api::{Agent, Glif, GlifDetails, GlifUser};
use crate::tools::store::SavedBinding;

const MAX_DESCRIPTION_CHARS: usize = 200;

fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

fn handle(user: Option<&GlifUser>) -> Option<&str> {
    user.and_then(|u| u.username.as_deref().or(u.name.as_deref()))
}

pub fn glif_line(glif: &Glif) -> String {
    let mut line = format!("- {} (id: {})", glif.name, glif.id);
    if let Some(author) = handle(glif.user.as_ref()) {
        let _ = write!(line, " by @{author}");
    }
    if let Some(runs) = glif.completed_spell_run_count {
        let _ = write!(line, " [{runs} runs]");
    }
    if let Some(desc) = glif.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = write!(line, "\n  {}", truncate(desc, MAX_DESCRIPTION_CHARS));
    }
    line
}

pub fn glif_list(title: &str, glifs: &[Glif]) -> String {
    if glifs.is_empty() {
        return format!("{title}: none found");
    }
    let mut out = format!("{title} ({}):\n", glifs.len());
    for glif in glifs {
        out.push_str(&glif_line(glif));
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn glif_details(details: &GlifDetails) -> String {
    let glif = &details.glif;
    let mut out = format!("Name: {}\nID: {}\n", glif.name, glif.id);
    if let Some(desc) = glif.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "Description: {}", desc.trim());
    }
    if let Some(author) = handle(glif.user.as_ref()) {
        let _ = writeln!(out, "Created by: @{author}");
    }
    if let Some(created) = &glif.created_at {
        let _ = writeln!(out, "Created: {created}");
    }
    if let Some(output_type) = &glif.output_type {
        let _ = writeln!(out, "Output type: {output_type}");
    }
    let inputs = glif.input_names();
    if inputs.is_empty() {
        out.push_str("Inputs: none\n");
    } else {
        let _ = writeln!(out, "Inputs, in order: {}", inputs.join(", "));
    }

    if !details.recent_runs.is_empty() {
        out.push_str("\nRecent runs:\n");
        for run in &details.recent_runs {
            let _ = write!(out, "- {}", run.id);
            if let Some(created) = &run.created_at {
                let _ = write!(out, " at {created}");
            }
            if !run.inputs.is_empty() {
                let inputs = serde_json::Value::Object(run.inputs.clone());
                let _ = write!(out, "\n  inputs: {inputs}");
            }
            if let Some(output) = &run.output {
                let _ = write!(out, "\n  output: {}", truncate(output, MAX_DESCRIPTION_CHARS));
            }
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

pub fn user(user: &GlifUser) -> String {
    let mut out = format!("ID: {}\n", user.id);
    for (label, value) in [
        ("Name", &user.name),
        ("Username", &user.username),
        ("Bio", &user.bio),
        ("Website", &user.website),
        ("Image", &user.image),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            let _ = writeln!(out, "{label}: {}", value.trim());
        }
    }
    out.trim_end().to_string()
}

pub fn agent_list(agents: &[Agent]) -> String {
    if agents.is_empty() {
        return "Agents: none found".to_string();
    }
    let mut out = format!("Agents ({}):\n", agents.len());
    for agent in agents {
        let _ = write!(out, "- {} (id: {})", agent.name, agent.id);
        if let Some(username) = &agent.username {
            let _ = write!(out, " @{username}");
        }
        if !agent.skills.is_empty() {
            let _ = write!(out, " [{} glifs]", agent.skills.len());
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn agent(agent: &Agent) -> String {
    let mut out = format!("Agent: {}\nID: {}\n", agent.name, agent.id);
    if let Some(personality) = agent
        .personality
        .as_deref()
        .filter(|p| !p.trim().is_empty())
    {
        let _ = write!(out, "\nPersonality:\n{}\n", personality.trim());
    }

    let skills: Vec<_> = agent
        .skills
        .iter()
        .filter_map(|skill| skill.spell.as_ref().map(|spell| (skill, spell)))
        .collect();
    if !skills.is_empty() {
        out.push_str("\nGlifs (call with run_glif):\n");
        for (skill, spell) in skills {
            let name = skill.custom_name.as_deref().unwrap_or(&spell.name);
            let _ = write!(out, "- {name} (id: {})", spell.id);
            let desc = skill
                .custom_description
                .as_deref()
                .or(spell.description.as_deref())
                .filter(|d| !d.trim().is_empty());
            if let Some(desc) = desc {
                let _ = write!(out, ": {}", truncate(desc, MAX_DESCRIPTION_CHARS));
            }
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

pub fn saved_bindings(bindings: &[SavedBinding]) -> String {
    if bindings.is_empty() {
        return "No saved glif tools".to_string();
    }
    let mut out = format!("Saved glif tools ({}):\n", bindings.len());
    for b in bindings {
        let _ = write!(out, "- {} -> glif {} ({})", b.tool_name, b.id, b.name);
        if !b.description.trim().is_empty() {
            let _ = write!(out, ": {}", truncate(&b.description, MAX_DESCRIPTION_CHARS));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AgentSkill;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 5), "héllo…");
        assert_eq!(truncate("  short ", 10), "short");
    }

    #[test]
    fn test_glif_list_empty_and_populated() {
        assert_eq!(glif_list("Featured glifs", &[]), "Featured glifs: none found");

        let glif = Glif {
            id: "g1".into(),
            name: "Meme".into(),
            description: Some("Makes memes".into()),
            completed_spell_run_count: Some(12),
            user: Some(GlifUser {
                id: "u".into(),
                username: Some("jamie".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            glif_list("Featured glifs", &[glif]),
            "Featured glifs (1):\n- Meme (id: g1) by @jamie [12 runs]\n  Makes memes"
        );
    }

    #[test]
    fn test_agent_prefers_custom_names() {
        let helper = Agent {
            id: "a1".into(),
            name: "Helper".into(),
            personality: Some("Cheerful".into()),
            skills: vec![
                AgentSkill {
                    spell: Some(Glif {
                        id: "g1".into(),
                        name: "Original".into(),
                        description: Some("orig desc".into()),
                        ..Default::default()
                    }),
                    custom_name: Some("Renamed".into()),
                    custom_description: None,
                },
                AgentSkill::default(),
            ],
            ..Default::default()
        };
        let text = agent(&helper);
        assert!(text.contains("Personality:\nCheerful"));
        assert!(text.contains("- Renamed (id: g1): orig desc"));
        assert_eq!(text.matches("\n- ").count(), 1);
    }

    #[test]
    fn test_saved_bindings() {
        assert_eq!(saved_bindings(&[]), "No saved glif tools");
        let b = SavedBinding::new("g1", "meme", "Meme", "");
        assert_eq!(
            saved_bindings(&[b]),
            "Saved glif tools (1):\n- meme -> glif g1 (Meme)"
        );
    }
}
