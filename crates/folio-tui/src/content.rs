//! Static portfolio content. Presentation data only; section order and
//! labels come from the config.

pub const HERO_TITLE: &str = "Creative Developer";

pub const HERO_SUBTITLE: &str = "Building motion-rich interfaces for the web and the terminal";

pub const CTA_LABELS: [&str; 2] = ["View Work", "Get in Touch"];

pub const ABOUT: &[&str] = &[
    "I design and build interfaces where motion carries meaning.",
    "Ten years across product teams, agencies and open source,",
    "mostly at the seam between rendering engines and the people",
    "who have to ship with them.",
];

pub const ACHIEVEMENTS: &[&str] = &[
    "Awwwards Site of the Day",
    "CSS Design Awards: Best UI",
    "FWA of the Day",
    "Speaker at JSConf EU",
    "Open source: 4k stars",
    "Webby Honoree",
];

/// Separator drawn between marquee items
pub const MARQUEE_SEPARATOR: &str = "  *  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Project {
    pub title: &'static str,
    pub stack: &'static str,
    pub blurb: &'static str,
}

pub const PROJECTS: &[Project] = &[
    Project {
        title: "Lumen",
        stack: "Rust / WebGPU",
        blurb: "A particle playground driven by audio input",
    },
    Project {
        title: "Tidewater",
        stack: "TypeScript / Three.js",
        blurb: "Interactive coastline erosion atlas",
    },
    Project {
        title: "Paperfold",
        stack: "Svelte / GSAP",
        blurb: "Scroll-told annual report for a climate fund",
    },
    Project {
        title: "Quiet Hours",
        stack: "Rust / ratatui",
        blurb: "A focus timer that lives in your terminal",
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skill {
    pub name: &'static str,
    pub level: f64,
}

pub const SKILLS: &[Skill] = &[
    Skill { name: "Interaction design", level: 92.0 },
    Skill { name: "Rust", level: 85.0 },
    Skill { name: "TypeScript", level: 90.0 },
    Skill { name: "WebGL / shaders", level: 75.0 },
    Skill { name: "Motion systems", level: 88.0 },
];

pub const TOOLS: &[&str] = &["Figma", "Blender", "Vite", "Cargo", "GSAP", "Three.js", "Neovim"];

pub const CONTACT: &[&str] = &[
    "Have a project in mind or just want to say hi?",
    "My inbox is always open.",
];

pub const CONTACT_BUTTON: &str = "[  Say Hello  ]";

/// One loop of the marquee text
pub fn marquee_cycle() -> String {
    let mut cycle = String::new();
    for item in ACHIEVEMENTS {
        cycle.push_str(item);
        cycle.push_str(MARQUEE_SEPARATOR);
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marquee_cycle_ends_with_separator() {
        let cycle = marquee_cycle();
        assert!(cycle.starts_with(ACHIEVEMENTS[0]));
        assert!(cycle.ends_with(MARQUEE_SEPARATOR));
    }

    #[test]
    fn test_skill_levels_are_percentages() {
        assert!(SKILLS.iter().all(|s| (0.0..=100.0).contains(&s.level)));
    }
}
