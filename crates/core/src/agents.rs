//! The agents the backend routes queries to.

/// Presentation data for one agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgentProfile {
    /// Identifier used by the backend in `agent_used`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// What the agent is for.
    pub description: &'static str,
    /// Typical queries it handles.
    pub specialties: &'static [&'static str],
    /// Accent color as RGB.
    pub accent: (u8, u8, u8),
}

/// Every known agent. The last one is the fallback.
pub const AGENTS: &[AgentProfile] = &[
    AgentProfile {
        id: "professional",
        name: "Professional",
        description: "Technical expertise and work-related queries",
        specialties: &["Programming", "Architecture", "Problem-solving"],
        accent: (0x4f, 0x9e, 0xff),
    },
    AgentProfile {
        id: "communication",
        name: "Communication",
        description: "Writing style, tone, and communication patterns",
        specialties: &["Email drafting", "Content review", "Tone adjustment"],
        accent: (0x00, 0xd9, 0xff),
    },
    AgentProfile {
        id: "knowledge",
        name: "Knowledge",
        description: "Personal knowledge base, facts, and memories",
        specialties: &["Personal info", "Preferences", "Experiences"],
        accent: (0xa7, 0x8b, 0xfa),
    },
    AgentProfile {
        id: "decision",
        name: "Decision",
        description: "Decision-making support and trade-off analysis",
        specialties: &["Recommendations", "Trade-offs", "Evaluations"],
        accent: (0xf4, 0x72, 0xb6),
    },
    AgentProfile {
        id: "general",
        name: "General",
        description: "General queries and fallback assistance",
        specialties: &["General chat", "Misc queries", "Default handler"],
        accent: (0x8b, 0x92, 0xb0),
    },
];

impl AgentProfile {
    /// Looks up a known agent, ignoring ASCII case.
    pub fn find(id: &str) -> Option<&'static AgentProfile> {
        AGENTS.iter().find(|agent| agent.id.eq_ignore_ascii_case(id))
    }

    /// Looks up an agent, falling back to the general agent for unknown
    /// identifiers.
    #[inline]
    pub fn resolve(id: &str) -> &'static AgentProfile {
        Self::find(id).unwrap_or(&AGENTS[AGENTS.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(AgentProfile::resolve("knowledge").name, "Knowledge");
        assert_eq!(AgentProfile::resolve("Decision").id, "decision");
        assert_eq!(AgentProfile::resolve("astrologer").id, "general");
        assert_eq!(AgentProfile::resolve("").id, "general");
        assert!(AgentProfile::find("astrologer").is_none());
    }
}
