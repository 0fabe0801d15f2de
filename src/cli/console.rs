//! Interactive governance console.
//!
//! Each input line is one strictly ordered engine call. The console holds
//! no governance state of its own: it parses a command, invokes the engine,
//! and renders the result verbatim. Errors are printed, never fatal.

use super::config::{default_config_path, PhloemConfig};
use phloem::governance::{
    format_audit_log, AuditQuery, AuditTrail, FundEngine, Proposal, TracingSink,
};
use phloem::identity::MemberId;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Console command types
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Submit a spending proposal
    Propose {
        proposer: String,
        amount: String,
        title: String,
        description: String,
    },

    /// Cast a vote on a proposal
    Vote {
        voter: String,
        proposal_id: String,
        choice: String,
    },

    /// Show one proposal
    Show { proposal_id: String },

    /// List all proposals
    List,

    /// Check whether a member has voted on a proposal
    Voted { proposal_id: String, member: String },

    /// List registered members
    Members,

    /// Show the audit trail
    Audit { limit: Option<String> },

    /// Dump all proposals as JSON
    Export,

    /// Show help
    Help,

    /// Leave the console
    Quit,

    /// Unknown command
    Unknown(String),
}

/// Parse a command from an input line.
pub fn parse_command(text: &str) -> Command {
    let text = text.trim();

    if !text.starts_with('/') {
        return Command::Unknown(text.to_string());
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.is_empty() {
        return Command::Unknown(text.to_string());
    }

    match parts[0] {
        "/propose" => {
            if parts.len() < 4 {
                return Command::Unknown(text.to_string());
            }
            // Title runs to the "--" separator; description is the rest.
            let rest = &parts[3..];
            let (title, description) = match rest.iter().position(|p| *p == "--") {
                Some(split) => (rest[..split].join(" "), rest[split + 1..].join(" ")),
                None => (rest.join(" "), String::new()),
            };
            Command::Propose {
                proposer: parts[1].to_string(),
                amount: parts[2].to_string(),
                title,
                description,
            }
        }

        "/vote" => {
            if parts.len() != 4 {
                return Command::Unknown(text.to_string());
            }
            Command::Vote {
                voter: parts[1].to_string(),
                proposal_id: parts[2].to_string(),
                choice: parts[3].to_string(),
            }
        }

        "/show" => {
            if parts.len() != 2 {
                return Command::Unknown(text.to_string());
            }
            Command::Show {
                proposal_id: parts[1].to_string(),
            }
        }

        "/list" => Command::List,

        "/voted" => {
            if parts.len() != 3 {
                return Command::Unknown(text.to_string());
            }
            Command::Voted {
                proposal_id: parts[1].to_string(),
                member: parts[2].to_string(),
            }
        }

        "/members" => Command::Members,

        "/audit" => Command::Audit {
            limit: parts.get(1).map(|s| s.to_string()),
        },

        "/export" => Command::Export,

        "/help" => Command::Help,

        "/quit" | "/exit" => Command::Quit,

        _ => Command::Unknown(text.to_string()),
    }
}

/// Handle one parsed command. Returns the reply to print, or `None` when
/// the console should exit.
pub fn handle_command(
    engine: &mut FundEngine,
    audit: &AuditTrail,
    command: Command,
) -> Option<String> {
    let reply = match command {
        Command::Propose {
            proposer,
            amount,
            title,
            description,
        } => handle_propose(engine, &proposer, &amount, &title, &description),

        Command::Vote {
            voter,
            proposal_id,
            choice,
        } => handle_vote(engine, &voter, &proposal_id, &choice),

        Command::Show { proposal_id } => match parse_proposal_id(&proposal_id) {
            Ok(id) => match engine.get_proposal(id) {
                Ok(proposal) => format_proposal(&proposal),
                Err(e) => format!("Error: {}", e),
            },
            Err(e) => e,
        },

        Command::List => {
            if engine.proposal_count() == 0 {
                "No proposals yet.".to_string()
            } else {
                let mut lines = Vec::new();
                for id in engine.all_proposal_ids() {
                    // Ids come from the store, so the lookup cannot miss.
                    if let Ok(p) = engine.get_proposal(id) {
                        lines.push(format!(
                            "#{} [{}] {} — {} units, {} votes",
                            p.id,
                            p.status,
                            p.title,
                            p.amount,
                            p.total_votes()
                        ));
                    }
                }
                lines.join("\n")
            }
        }

        Command::Voted {
            proposal_id,
            member,
        } => match parse_proposal_id(&proposal_id) {
            Ok(id) => match engine.has_voted(id, &MemberId::new(member.clone())) {
                Ok(true) => format!("{} has voted on proposal #{}", member, id),
                Ok(false) => format!("{} has not voted on proposal #{}", member, id),
                Err(e) => format!("Error: {}", e),
            },
            Err(e) => e,
        },

        Command::Members => {
            let members = engine.members();
            if members.is_empty() {
                "No registered members yet.".to_string()
            } else {
                let names: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
                format!("{} member(s): {}", members.len(), names.join(", "))
            }
        }

        Command::Audit { limit } => {
            let limit = match limit {
                Some(raw) => match raw.parse::<usize>() {
                    Ok(n) => Some(n),
                    Err(_) => return Some("Error: audit limit must be an integer".to_string()),
                },
                None => AuditQuery::default().limit,
            };
            let entries = audit.query(&AuditQuery {
                limit,
                ..Default::default()
            });
            format_audit_log(&entries)
        }

        Command::Export => {
            let proposals: Vec<Proposal> = engine
                .all_proposal_ids()
                .into_iter()
                .filter_map(|id| engine.get_proposal(id).ok())
                .collect();
            match serde_json::to_string_pretty(&proposals) {
                Ok(json) => json,
                Err(e) => format!("Error: failed to serialize proposals: {}", e),
            }
        }

        Command::Help => help_text(),

        Command::Quit => return None,

        Command::Unknown(text) => {
            if text.is_empty() {
                String::new()
            } else {
                format!("Unknown command: {} (try /help)", text)
            }
        }
    };

    Some(reply)
}

fn handle_propose(
    engine: &mut FundEngine,
    proposer: &str,
    amount: &str,
    title: &str,
    description: &str,
) -> String {
    if proposer.trim().is_empty() {
        return "Error: member name cannot be blank".to_string();
    }
    let amount: u128 = match amount.parse() {
        Ok(n) => n,
        Err(_) => return "Error: amount must be a non-negative integer".to_string(),
    };

    match engine.create_proposal(MemberId::new(proposer), title, description, amount) {
        Ok(id) => format!("Created proposal #{}", id),
        Err(e) => format!("Error: {}", e),
    }
}

fn handle_vote(engine: &mut FundEngine, voter: &str, proposal_id: &str, choice: &str) -> String {
    if voter.trim().is_empty() {
        return "Error: member name cannot be blank".to_string();
    }
    let id = match parse_proposal_id(proposal_id) {
        Ok(id) => id,
        Err(e) => return e,
    };
    let support = match choice {
        "yes" => true,
        "no" => false,
        _ => return "Error: vote choice must be yes or no".to_string(),
    };

    match engine.vote(id, MemberId::new(voter), support) {
        Ok(()) => {
            // Render the post-vote state so the caller sees resolutions.
            match engine.get_proposal(id) {
                Ok(p) => format!(
                    "Recorded {} vote on #{} — now [{}] with {} votes",
                    choice,
                    id,
                    p.status,
                    p.total_votes()
                ),
                Err(e) => format!("Error: {}", e),
            }
        }
        Err(e) => format!("Error: {}", e),
    }
}

fn parse_proposal_id(raw: &str) -> Result<u64, String> {
    raw.parse()
        .map_err(|_| "Error: proposal id must be an integer".to_string())
}

fn format_proposal(p: &Proposal) -> String {
    let mut out = format!(
        "Proposal #{}: {}\n  Status:   {}\n  Proposer: {}\n  Amount:   {} units\n  Votes:    {} yes / {} no\n  Created:  Unix {}",
        p.id, p.title, p.status, p.proposer, p.amount, p.yes_votes, p.no_votes, p.created_at
    );
    if !p.description.is_empty() {
        out.push_str(&format!("\n  {}", p.description));
    }
    out
}

fn help_text() -> String {
    [
        "Commands:",
        "  /propose <member> <amount> <title> [-- <description>]",
        "      Submit a spending proposal (amount in smallest currency unit)",
        "  /vote <member> <id> yes|no    Cast a vote",
        "  /show <id>                    Show one proposal",
        "  /list                         List all proposals",
        "  /voted <id> <member>          Check whether a member voted",
        "  /members                      List registered members",
        "  /audit [n]                    Show the last n audit entries",
        "  /export                       Dump all proposals as JSON",
        "  /help                         Show this help message",
        "  /quit                         Leave the console",
    ]
    .join("\n")
}

/// Run the interactive governance console
///
/// Loads (or creates) the operator config, initializes logging, builds an
/// engine with the configured governance parameters, subscribes the tracing
/// sink and the audit trail, and processes stdin line by line. Session
/// state lives in the engine and is discarded on exit.
pub fn execute(config_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    // Determine config path (use provided or default)
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    // Load or create configuration
    let config = if config_path.exists() {
        PhloemConfig::load(&config_path)?
    } else {
        println!("No config file found. Creating default configuration...");
        PhloemConfig::create_default(&config_path)?;
        println!("   Created: {}", config_path.display());
        PhloemConfig::load(&config_path)?
    };

    init_logging(&config.logging.level);

    let mut engine = FundEngine::new(config.governance.clone());
    engine.subscribe(Box::new(TracingSink));
    let audit = AuditTrail::new();
    engine.subscribe(Box::new(audit.clone()));

    println!("Phloem governance console (quorum: {})", config.governance.quorum);
    println!("Type /help for commands, /quit to leave.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        match handle_command(&mut engine, &audit, parse_command(&line)) {
            Some(reply) if reply.is_empty() => {}
            Some(reply) => println!("{}", reply),
            None => break,
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // try_init: repeated initialization (e.g. in tests) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use phloem::governance::GovernanceConfig;

    fn console_engine() -> (FundEngine, AuditTrail) {
        let mut engine = FundEngine::new(GovernanceConfig::default());
        let audit = AuditTrail::new();
        engine.subscribe(Box::new(audit.clone()));
        (engine, audit)
    }

    fn run(engine: &mut FundEngine, audit: &AuditTrail, line: &str) -> String {
        handle_command(engine, audit, parse_command(line)).expect("command should not quit")
    }

    #[test]
    fn test_parse_propose_with_description() {
        let command = parse_command("/propose alice 500 Buy Event Tickets -- For the conference");

        assert_eq!(
            command,
            Command::Propose {
                proposer: "alice".to_string(),
                amount: "500".to_string(),
                title: "Buy Event Tickets".to_string(),
                description: "For the conference".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_propose_without_description() {
        let command = parse_command("/propose alice 500 Buy tickets");

        assert_eq!(
            command,
            Command::Propose {
                proposer: "alice".to_string(),
                amount: "500".to_string(),
                title: "Buy tickets".to_string(),
                description: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_propose_missing_args_is_unknown() {
        assert!(matches!(
            parse_command("/propose alice 500"),
            Command::Unknown(_)
        ));
    }

    #[test]
    fn test_parse_vote() {
        let command = parse_command("/vote bob 0 yes");

        assert_eq!(
            command,
            Command::Vote {
                voter: "bob".to_string(),
                proposal_id: "0".to_string(),
                choice: "yes".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("/list"), Command::List);
        assert_eq!(parse_command("/members"), Command::Members);
        assert_eq!(parse_command("/export"), Command::Export);
        assert_eq!(parse_command("/help"), Command::Help);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/audit"), Command::Audit { limit: None });
        assert_eq!(
            parse_command("/audit 5"),
            Command::Audit {
                limit: Some("5".to_string())
            }
        );
    }

    #[test]
    fn test_parse_non_slash_input_is_unknown() {
        assert!(matches!(parse_command("hello"), Command::Unknown(_)));
    }

    #[test]
    fn test_propose_and_show_flow() {
        let (mut engine, audit) = console_engine();

        let reply = run(
            &mut engine,
            &audit,
            "/propose alice 500 Buy tickets -- Conference trip",
        );
        assert_eq!(reply, "Created proposal #0");

        let reply = run(&mut engine, &audit, "/show 0");
        assert!(reply.contains("Proposal #0: Buy tickets"));
        assert!(reply.contains("Status:   Pending"));
        assert!(reply.contains("Conference trip"));
    }

    #[test]
    fn test_vote_flow_reports_resolution() {
        let (mut engine, audit) = console_engine();
        run(&mut engine, &audit, "/propose alice 500 Buy tickets");

        run(&mut engine, &audit, "/vote alice 0 yes");
        run(&mut engine, &audit, "/vote bob 0 yes");
        let reply = run(&mut engine, &audit, "/vote carol 0 yes");

        assert!(reply.contains("[Approved]"));
        assert!(reply.contains("3 votes"));
    }

    #[test]
    fn test_engine_errors_are_rendered_not_fatal() {
        let (mut engine, audit) = console_engine();
        run(&mut engine, &audit, "/propose alice 500 Buy tickets");

        let reply = run(&mut engine, &audit, "/vote bob 7 yes");
        assert_eq!(reply, "Error: Proposal not found: 7");

        run(&mut engine, &audit, "/vote bob 0 yes");
        let reply = run(&mut engine, &audit, "/vote bob 0 no");
        assert_eq!(reply, "Error: Already voted on proposal 0");

        let reply = run(&mut engine, &audit, "/propose alice abc Title");
        assert_eq!(reply, "Error: amount must be a non-negative integer");

        let reply = run(&mut engine, &audit, "/propose alice 0 Title");
        assert_eq!(reply, "Error: Invalid input: Amount must be greater than 0");
    }

    #[test]
    fn test_members_and_voted_queries() {
        let (mut engine, audit) = console_engine();
        run(&mut engine, &audit, "/propose alice 500 Buy tickets");
        run(&mut engine, &audit, "/vote bob 0 yes");

        let reply = run(&mut engine, &audit, "/members");
        assert_eq!(reply, "1 member(s): alice");

        let reply = run(&mut engine, &audit, "/voted 0 bob");
        assert_eq!(reply, "bob has voted on proposal #0");

        let reply = run(&mut engine, &audit, "/voted 0 carol");
        assert_eq!(reply, "carol has not voted on proposal #0");
    }

    #[test]
    fn test_audit_command_shows_committed_changes() {
        let (mut engine, audit) = console_engine();
        run(&mut engine, &audit, "/propose alice 500 Buy tickets");
        run(&mut engine, &audit, "/vote bob 0 yes");

        let reply = run(&mut engine, &audit, "/audit");
        assert!(reply.contains("created by alice"));
        assert!(reply.contains("bob voted yes on proposal #0"));

        // Rejected calls leave no audit entry.
        run(&mut engine, &audit, "/vote bob 0 no");
        assert_eq!(audit.len(), 2);
    }

    #[test]
    fn test_export_produces_json_snapshots() {
        let (mut engine, audit) = console_engine();
        run(&mut engine, &audit, "/propose alice 500 Buy tickets");

        let reply = run(&mut engine, &audit, "/export");
        let parsed: Vec<Proposal> = serde_json::from_str(&reply).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Buy tickets");
    }

    #[test]
    fn test_quit_ends_session() {
        let (mut engine, audit) = console_engine();
        assert!(handle_command(&mut engine, &audit, Command::Quit).is_none());
    }

    #[test]
    fn test_blank_line_prints_nothing() {
        let (mut engine, audit) = console_engine();
        let reply = run(&mut engine, &audit, "   ");
        assert_eq!(reply, "");
    }
}
