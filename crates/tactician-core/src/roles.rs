//! Player roles and which positions may use them.

pub const ROLE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Keeper", "Traditional goalkeeper focused on shot stopping."),
    ("Modern Keeper", "Sweeper keeper who defends outside the box and starts attacks."),
    ("Stopper", "Aggressive centre back who steps out to engage the striker."),
    ("General Defender", "All-round centre back handling the basic defensive duties."),
    ("Ball-Playing Defender", "Centre back who builds attacks from the back."),
    ("Wingback", "Attacking full back who regularly joins the attack."),
    ("Fullback", "Traditional full back prioritising defensive work."),
    ("Wide Midfielder", "Flank midfielder balancing attack and defence."),
    ("Ball-Winning Midfielder", "Midfield destroyer who breaks up opposition play."),
    ("Box-to-box Midfielder", "Tireless shuttler covering the whole pitch."),
    ("General Midfielder", "Versatile central midfielder with mixed duties."),
    ("Advanced Playmaker", "Creative hub operating in the final third."),
    ("Deep-lying Playmaker", "Deep orchestrator who sets the tempo from behind."),
    ("Playmaker", "Conductor who dictates the team's passing."),
    ("Winger", "Touchline winger who crosses or beats his man."),
    ("Wide Forward", "Wide attacker who cuts inside to shoot or combine."),
    ("Support Striker", "Second striker linking midfield and the front line."),
    ("Finisher", "Penalty-box predator focused on scoring."),
    ("Deep-lying Forward", "Forward who drops deep to link play."),
    ("General Forward", "Complete forward who scores, creates and holds the ball up."),
    ("Target Man", "Physical striker who wins headers and holds up play."),
];

pub const POSITION_ROLES: &[(&str, &[&str])] = &[
    ("GK", &["Keeper", "Modern Keeper"]),
    ("DC", &["Stopper", "General Defender", "Ball-Playing Defender"]),
    ("DL", &["Wingback", "Fullback"]),
    ("DR", &["Wingback", "Fullback"]),
    ("DML", &["Wingback", "Fullback", "Wide Midfielder"]),
    ("DMR", &["Wingback", "Fullback", "Wide Midfielder"]),
    ("DMC", &["Ball-Winning Midfielder", "Box-to-box Midfielder", "Deep-lying Playmaker"]),
    ("ML", &["Wingback", "Winger", "Playmaker", "Wide Midfielder"]),
    ("MR", &["Wingback", "Winger", "Playmaker", "Wide Midfielder"]),
    (
        "MC",
        &[
            "General Midfielder",
            "Ball-Winning Midfielder",
            "Box-to-box Midfielder",
            "Playmaker",
            "Advanced Playmaker",
        ],
    ),
    ("AMC", &["Advanced Playmaker", "Support Striker"]),
    ("AML", &["Winger", "Advanced Playmaker", "Wide Forward"]),
    ("AMR", &["Winger", "Advanced Playmaker", "Wide Forward"]),
    ("FL", &["Wide Forward", "General Forward", "Winger"]),
    ("FR", &["Wide Forward", "General Forward", "Winger"]),
    ("FC", &["General Forward", "Target Man", "Finisher", "Deep-lying Forward"]),
];

/// Roles allowed at `position`. `ST` is accepted as an alias for `FC`.
pub fn roles_for(position: &str) -> Option<&'static [&'static str]> {
    let pos = position.trim().to_ascii_uppercase();
    let pos = if pos == "ST" { "FC".to_string() } else { pos };
    POSITION_ROLES
        .iter()
        .find(|(p, _)| *p == pos)
        .map(|(_, roles)| *roles)
}

pub fn role_names() -> impl Iterator<Item = &'static str> {
    ROLE_DESCRIPTIONS.iter().map(|(name, _)| *name)
}

pub fn describe(role: &str) -> Option<&'static str> {
    ROLE_DESCRIPTIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(role))
        .map(|(_, d)| *d)
}

/// Prompt section listing the roles per position, pairing mirrored
/// positions (`DL, DR: ...`).
pub fn render_position_roles() -> String {
    let mut out = String::from("**AVAILABLE PLAYER ROLES (Assign roles strictly from the options available for each position)**\n");
    let mut i = 0;
    while i < POSITION_ROLES.len() {
        let (pos, roles) = POSITION_ROLES[i];
        let mut label = pos.to_string();
        if let Some((next, next_roles)) = POSITION_ROLES.get(i + 1) {
            if *next_roles == roles {
                label = format!("{pos}, {next}");
                i += 1;
            }
        }
        if pos == "FC" {
            label.push_str(", ST");
        }
        out.push_str(&format!("- {label}: {}\n", roles.join(", ")));
        i += 1;
    }
    out
}
