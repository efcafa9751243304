const BOT_PREFIX: &str = "ai.";
const NPC_PREFIX: &str = "npc.";

/// Kind of participant behind an account id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// `ai.` prefixed accounts, counted as bots
    Bot,
    /// `npc.` prefixed accounts, ignored everywhere
    Npc,
    Player,
}

impl AccountKind {
    pub fn classify(account_id: &str) -> Self {
        if account_id.starts_with(BOT_PREFIX) {
            AccountKind::Bot
        } else if account_id.starts_with(NPC_PREFIX) {
            AccountKind::Npc
        } else {
            AccountKind::Player
        }
    }

    pub fn is_player(self) -> bool {
        self == AccountKind::Player
    }
}
