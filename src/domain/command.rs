/// The fixed set of chat commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    AddSubscription,
    AddFunds,
    ViewBalance,
    ViewSubscriptions,
    TransactionHistory,
}

impl Command {
    /// Every command, in the order shown by `/help`.
    pub const ALL: [Command; 7] = [
        Command::Start,
        Command::AddFunds,
        Command::AddSubscription,
        Command::ViewBalance,
        Command::ViewSubscriptions,
        Command::TransactionHistory,
        Command::Help,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::AddSubscription => "add_subscription",
            Command::AddFunds => "add_funds",
            Command::ViewBalance => "view_balance",
            Command::ViewSubscriptions => "view_subscriptions",
            Command::TransactionHistory => "transaction_history",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Start using the bot",
            Command::Help => "Show this help",
            Command::AddSubscription => "Add a subscription",
            Command::AddFunds => "Top up your balance",
            Command::ViewBalance => "Show your current balance",
            Command::ViewSubscriptions => "List your subscriptions",
            Command::TransactionHistory => "Show your transaction history",
        }
    }

    /// Parses a message as a command.
    ///
    /// Accepts `/keyword` and `/keyword@botname`, ignoring surrounding whitespace.
    /// Matching is case-sensitive and anything after the keyword makes the message
    /// a non-command.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.trim().strip_prefix('/')?;
        let keyword = match body.split_once('@') {
            Some((keyword, bot)) if !bot.is_empty() && !bot.contains(char::is_whitespace) => {
                keyword
            }
            Some(_) => return None,
            None => body,
        };
        Self::ALL.into_iter().find(|c| c.keyword() == keyword)
    }
}
