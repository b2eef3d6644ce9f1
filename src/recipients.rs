//! Recipient address book operations
//!
//! Listing enriches each entry with a profile image looked up by email.
//! Adding checks for a duplicate email locally before touching the backend.
//! Editing is remove-then-add and is not atomic: if the add fails after the
//! remove succeeded, the old entry is gone.

use crate::collaborators::RemoteApi;
use crate::error::{BackendError, SessionError};
use crate::models::{Recipient, TransferDraft};
use crate::notifications::{Notification, Notifier};
use crate::session::{SessionEvent, SessionStore};

pub const MSG_DUPLICATE: &str = "Recipient already exists.";
pub const MSG_ADDED: &str = "Recipient added successfully.";
pub const MSG_MODIFIED: &str = "Recipient modified successfully.";
pub const MSG_REMOVED: &str = "Recipient removed successfully.";

/// Fetch recipients and attach profile images where a lookup succeeds
///
/// Lookups run concurrently; output order matches the backend's.
pub async fn list_recipients(
    api: &dyn RemoteApi,
    id_token: &str,
) -> Result<Vec<Recipient>, BackendError> {
    let recipients = api.get_recipients(id_token).await?;

    let lookups = recipients.into_iter().map(|recipient| async move {
        match api.get_user_profile_by_email(&recipient.email).await {
            Ok(profile) => Recipient {
                image_url: profile.image_url,
                ..recipient
            },
            Err(e) => {
                log::warn!("Profile lookup failed for {}: {}", recipient.email, e);
                recipient
            }
        }
    });

    Ok(futures::future::join_all(lookups).await)
}

pub async fn refresh_recipients(
    api: &dyn RemoteApi,
    store: &SessionStore,
    id_token: &str,
) -> Result<usize, SessionError> {
    let recipients = list_recipients(api, id_token).await?;
    let count = recipients.len();
    store.dispatch(SessionEvent::RecipientsLoaded(recipients));
    Ok(count)
}

pub async fn add_recipient(
    api: &dyn RemoteApi,
    store: &SessionStore,
    notifier: &Notifier,
    id_token: &str,
    recipient: Recipient,
) -> Result<(), SessionError> {
    if store.snapshot().has_recipient(&recipient.email) {
        notifier.enqueue(Notification::error(MSG_DUPLICATE));
        return Err(SessionError::Duplicate {
            email: recipient.email,
        });
    }

    api.add_recipient(id_token, &recipient).await?;
    log::info!("Added recipient {}", recipient.email);
    notifier.enqueue(Notification::info(MSG_ADDED));

    // Prefill the transfer form with the new recipient
    store.dispatch(SessionEvent::TransferDraftUpdated(TransferDraft {
        destination: recipient.email.clone(),
        receiver_name: recipient.name.clone(),
        destination_error: None,
    }));
    store.dispatch(SessionEvent::RecipientAdded(recipient));
    Ok(())
}

pub async fn remove_recipient(
    api: &dyn RemoteApi,
    store: &SessionStore,
    notifier: &Notifier,
    id_token: &str,
    recipient: Recipient,
) -> Result<(), SessionError> {
    api.remove_recipient(id_token, &recipient).await?;
    log::info!("Removed recipient {}", recipient.email);
    store.dispatch(SessionEvent::RecipientRemoved(recipient));
    notifier.enqueue(Notification::info(MSG_REMOVED));
    Ok(())
}

pub async fn edit_recipient(
    api: &dyn RemoteApi,
    store: &SessionStore,
    notifier: &Notifier,
    id_token: &str,
    old: Recipient,
    new: Recipient,
) -> Result<(), SessionError> {
    api.remove_recipient(id_token, &old).await?;
    store.dispatch(SessionEvent::RecipientRemoved(old.clone()));

    if let Err(e) = api.add_recipient(id_token, &new).await {
        log::error!(
            "Edit of {} failed after removal; recipient is no longer stored: {}",
            old.email,
            e
        );
        return Err(e.into());
    }

    log::info!("Edited recipient {} -> {}", old.email, new.email);
    store.dispatch(SessionEvent::RecipientAdded(new));
    notifier.enqueue(Notification::info(MSG_MODIFIED));
    Ok(())
}
