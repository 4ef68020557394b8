use super::ledger::{Ledger, Registration};
use super::replies;
use crate::domain::command::Command;
use crate::domain::conversation::{Completion, Dialogue, Prompt, Transition};
use crate::domain::message::InboundMessage;
use crate::domain::user::Identity;
use crate::error::{Result, TrackerError};
use std::collections::HashMap;
use tracing::debug;

/// Routes every inbound message to exactly one handler.
///
/// An open dialogue takes priority: while a user has one, each message they send
/// is the answer to the current step. Otherwise the message is matched against
/// the command set, and anything else is ignored.
///
/// Messages are handled one at a time through `&mut self`, which is what keeps the
/// dialogue map and the ledger's read-modify-write sequences consistent.
pub struct CommandRouter {
    ledger: Ledger,
    dialogues: HashMap<Identity, Dialogue>,
}

impl CommandRouter {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            dialogues: HashMap::new(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The dialogue currently open for `identity`, if any.
    pub fn dialogue(&self, identity: Identity) -> Option<&Dialogue> {
        self.dialogues.get(&identity)
    }

    /// Handles one message and returns the reply to send, if any.
    ///
    /// Storage failures are returned as errors; the sender's dialogue is closed
    /// in that case.
    pub async fn handle(&mut self, message: &InboundMessage) -> Result<Option<String>> {
        let sender = message.sender;
        if let Some(dialogue) = self.dialogues.remove(&sender) {
            return self
                .continue_dialogue(sender, dialogue, &message.text)
                .await
                .map(Some);
        }

        match Command::parse(&message.text) {
            Some(command) => {
                debug!(sender, command = command.keyword(), "dispatching command");
                self.dispatch(sender, command).await.map(Some)
            }
            None => {
                debug!(sender, "ignoring message outside of a dialogue");
                Ok(None)
            }
        }
    }

    async fn continue_dialogue(
        &mut self,
        sender: Identity,
        dialogue: Dialogue,
        text: &str,
    ) -> Result<String> {
        match dialogue.advance(text) {
            Transition::Continue(next, prompt) => {
                debug!(sender, ?next, "dialogue advanced");
                self.dialogues.insert(sender, next);
                Ok(replies::prompt(prompt).to_string())
            }
            Transition::Retry(same, error) => {
                debug!(sender, %error, "dialogue input rejected, retrying step");
                self.dialogues.insert(sender, same);
                Ok(replies::input_error(error).to_string())
            }
            Transition::Abort(error) => {
                debug!(sender, %error, "dialogue input rejected, closing dialogue");
                Ok(replies::input_error(error).to_string())
            }
            Transition::Complete(completion) => self.complete(sender, completion).await,
        }
    }

    async fn complete(&self, sender: Identity, completion: Completion) -> Result<String> {
        match completion {
            Completion::Deposit(amount) => match self.ledger.deposit(sender, amount).await {
                Ok(balance) => Ok(replies::deposited(amount, balance)),
                Err(TrackerError::NotRegistered(_)) => Ok(replies::USER_NOT_FOUND.to_string()),
                Err(e) => Err(e),
            },
            Completion::Subscription {
                platform,
                cost,
                period,
            } => match self
                .ledger
                .purchase_subscription(sender, platform, cost, period)
                .await
            {
                Ok(purchase) => Ok(replies::subscribed(&purchase.subscription)),
                Err(TrackerError::InsufficientFunds { .. }) => {
                    Ok(replies::INSUFFICIENT_FUNDS.to_string())
                }
                Err(TrackerError::NotRegistered(_)) => Ok(replies::USER_NOT_FOUND.to_string()),
                Err(e) => Err(e),
            },
        }
    }

    async fn dispatch(&mut self, sender: Identity, command: Command) -> Result<String> {
        let user = self.ledger.get(sender).await?;
        match (command, user) {
            (Command::Help, _) => Ok(replies::help()),
            (Command::Start, _) => Ok(match self.ledger.register(sender).await? {
                Registration::Created(_) => replies::WELCOME.to_string(),
                Registration::Existing(_) => replies::WELCOME_BACK.to_string(),
            }),
            (_, None) => Ok(replies::NOT_REGISTERED.to_string()),
            (Command::AddFunds, Some(_)) => Ok(self.open_dialogue(sender, Dialogue::deposit())),
            (Command::AddSubscription, Some(user)) if !user.balance.is_positive() => {
                Ok(replies::FUND_FIRST.to_string())
            }
            (Command::AddSubscription, Some(_)) => {
                Ok(self.open_dialogue(sender, Dialogue::subscription()))
            }
            (Command::ViewBalance, Some(user)) => Ok(replies::balance(user.balance)),
            (Command::ViewSubscriptions, Some(_)) => {
                let subscriptions = self.ledger.subscriptions(sender).await?;
                if subscriptions.is_empty() {
                    Ok(replies::NO_SUBSCRIPTIONS.to_string())
                } else {
                    Ok(replies::subscriptions(&subscriptions))
                }
            }
            (Command::TransactionHistory, Some(_)) => {
                let history = self.ledger.history(sender).await?;
                if history.is_empty() {
                    Ok(replies::EMPTY_HISTORY.to_string())
                } else {
                    Ok(replies::history(&history))
                }
            }
        }
    }

    fn open_dialogue(
        &mut self,
        sender: Identity,
        (dialogue, prompt): (Dialogue, Prompt),
    ) -> String {
        debug!(sender, ?dialogue, "dialogue opened");
        self.dialogues.insert(sender, dialogue);
        replies::prompt(prompt).to_string()
    }
}
