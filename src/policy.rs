use crate::message::{Folder, MessageState, Verdict};

/// Label applied to spam-folder messages the classifier considers ham.
pub const FALSE_POSITIVE_LABEL: &str = "possible_false_positive";

/// The storage/transport seam the policy acts through. Implementations
/// wrap whatever actually holds the mail (IMAP session, local store,
/// test double); the policy itself never does I/O directly.
pub trait MessageStore {
    fn move_message(&mut self, id: &str, destination: Folder) -> anyhow::Result<()>;
    fn add_label(&mut self, id: &str, label: &str) -> anyhow::Result<()>;
}

/// What the policy decided to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    MovedToSpam,
    FlaggedFalsePositive,
    Unchanged,
}

/// Apply the folder-transition policy for one classified message.
///
/// The policy is asymmetric: inbox messages classified as spam are moved
/// to the spam folder automatically, while spam-folder messages
/// classified as ham are only labeled `possible_false_positive` and left
/// where they are. Promotion out of spam stays an explicit user action.
///
/// Relocation is fire-and-forget: a store failure is logged and the
/// verdict stands. Labeling is idempotent; an already-labeled message is
/// left untouched.
pub fn apply_verdict<S: MessageStore>(
    store: &mut S,
    message: &MessageState,
    verdict: &Verdict,
) -> Disposition {
    if verdict.is_spam && message.folder == Folder::Inbox {
        log::info!(
            "Moving message {} to spam (score {:.1})",
            message.id,
            verdict.score
        );
        if let Err(e) = store.move_message(&message.id, Folder::Spam) {
            log::warn!("Failed to move message {} to spam: {e}", message.id);
        }
        return Disposition::MovedToSpam;
    }

    if !verdict.is_spam && message.folder == Folder::Spam {
        if message.labels.iter().any(|l| l == FALSE_POSITIVE_LABEL) {
            return Disposition::Unchanged;
        }
        log::info!(
            "Flagging message {} as possible false positive (score {:.1})",
            message.id,
            verdict.score
        );
        if let Err(e) = store.add_label(&message.id, FALSE_POSITIVE_LABEL) {
            log::warn!("Failed to label message {}: {e}", message.id);
        }
        return Disposition::FlaggedFalsePositive;
    }

    Disposition::Unchanged
}
