use std::process::Command;

/// Argv for dumping the kernel neighbor (ARP) table.
pub const ARP_DUMP_COMMAND: &[&str] = &["arp", "-n"];
/// Argv for flushing every neighbor entry, with statistics output.
pub const ARP_FLUSH_COMMAND: &[&str] = &["ip", "-s", "-s", "neigh", "flush", "all"];

/// Captured output of an external neighbor-table command. Failure is folded
/// into empty text so callers compare against "no entries" instead of
/// branching on errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    text: String,
}

impl CommandOutcome {
    pub fn captured(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// OS-level neighbor-table inspection and flushing.
pub trait NeighborTools {
    fn dump(&mut self) -> CommandOutcome;
    fn flush(&mut self) -> CommandOutcome;
}

/// NeighborTools backed by the host `arp` and `ip` binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNeighborTools;

impl SystemNeighborTools {
    fn run(argv: &[&str]) -> CommandOutcome {
        let (program, args) = match argv.split_first() {
            Some(split) => split,
            None => return CommandOutcome::empty(),
        };
        match Command::new(program).args(args).output() {
            Ok(output) if output.status.success() => {
                CommandOutcome::captured(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            _ => CommandOutcome::empty(),
        }
    }
}

impl NeighborTools for SystemNeighborTools {
    fn dump(&mut self) -> CommandOutcome {
        Self::run(ARP_DUMP_COMMAND)
    }

    fn flush(&mut self) -> CommandOutcome {
        Self::run(ARP_FLUSH_COMMAND)
    }
}
