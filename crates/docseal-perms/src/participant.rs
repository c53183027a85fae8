//! Pending participant mutations.
//!
//! A [`ParticipantSet`] queues add/remove requests against a [`Baseline`],
//! the access state the server already holds. Creation starts from an empty
//! baseline; updates start from the original document. A request that
//! would not change the baseline emits nothing, and a request that undoes a
//! queued one cancels it instead of emitting its opposite.
//!
//! Once the document key is known, [`ParticipantSet::resolve`] turns the
//! queue into [`ParticipantRecord`]s, sealing the key for every added
//! entity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use docseal_core::{CryptoProvider, Document, Entity, EntityId, PrivateKey};

use crate::crypto::DocumentKey;
use crate::error::{PermsError, Result};
use crate::keyshare::wrap_document_key;

/// The role a participant plays on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    Signer,
    Observer,
    Workgroup,
    /// Anyone: the document key is published in the clear.
    Public,
}

/// Whether a mutation grants or withdraws access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Remove,
}

/// One pending mutation.
#[derive(Debug, Clone)]
pub enum Participant {
    /// Grant `entity` access; needs the document key sealed to it.
    Add { kind: ParticipantType, entity: Entity },
    /// Withdraw access by id.
    Remove { kind: ParticipantType, id: EntityId },
    /// Make the document public; needs the document key in the clear.
    AddPublic,
    /// Make the document private again.
    RemovePublic,
}

impl Participant {
    pub fn action(&self) -> Action {
        match self {
            Participant::Add { .. } | Participant::AddPublic => Action::Add,
            Participant::Remove { .. } | Participant::RemovePublic => Action::Remove,
        }
    }

    pub fn kind(&self) -> ParticipantType {
        match self {
            Participant::Add { kind, .. } | Participant::Remove { kind, .. } => *kind,
            Participant::AddPublic | Participant::RemovePublic => ParticipantType::Public,
        }
    }

    /// The target entity id, if this is not a public toggle.
    pub fn id(&self) -> Option<&EntityId> {
        match self {
            Participant::Add { entity, .. } => Some(&entity.id),
            Participant::Remove { id, .. } => Some(id),
            Participant::AddPublic | Participant::RemovePublic => None,
        }
    }

    /// Whether resolving this participant needs the document key.
    pub fn requires_document_key(&self) -> bool {
        self.action() == Action::Add
    }

    /// Whether resolving this participant needs a sender private key.
    pub fn requires_sender_key(&self) -> bool {
        matches!(self, Participant::Add { .. })
    }

    fn targets(&self, kind: ParticipantType, id: &EntityId) -> bool {
        self.kind() == kind && self.id() == Some(id)
    }
}

/// A resolved participant, as sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub action: Action,

    #[serde(rename = "type")]
    pub kind: ParticipantType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,

    /// Sealed document key (hex), or the raw key for `public`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// The access state the server already holds.
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    public: bool,
    members: HashSet<(ParticipantType, EntityId)>,
}

impl Baseline {
    /// Nothing exists yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The state of an existing document.
    pub fn from_document(document: &Document) -> Self {
        let observers = document
            .observers
            .iter()
            .map(|e| (ParticipantType::Observer, e.id.clone()));
        let workgroups = document
            .workgroups
            .iter()
            .map(|e| (ParticipantType::Workgroup, e.id.clone()));

        Self {
            public: document.public,
            members: observers.chain(workgroups).collect(),
        }
    }

    pub fn contains(&self, kind: ParticipantType, id: &EntityId) -> bool {
        self.members.contains(&(kind, id.clone()))
    }
}

/// Ordered queue of participant mutations against a baseline.
#[derive(Debug, Clone, Default)]
pub struct ParticipantSet {
    baseline: Baseline,
    pending: Vec<Participant>,
}

impl ParticipantSet {
    /// A set for a document that does not exist yet.
    pub fn for_create() -> Self {
        Self::with_baseline(Baseline::empty())
    }

    /// A set of changes to `document`.
    pub fn for_update(document: &Document) -> Self {
        Self::with_baseline(Baseline::from_document(document))
    }

    pub fn with_baseline(baseline: Baseline) -> Self {
        Self {
            baseline,
            pending: Vec::new(),
        }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// The queued mutations, in request order.
    pub fn pending(&self) -> &[Participant] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Grant `entity` access as `kind`.
    ///
    /// `ParticipantType::Public` is treated as `set_public(true)`.
    pub fn add(&mut self, kind: ParticipantType, entity: Entity) {
        if kind == ParticipantType::Public {
            return self.set_public(true);
        }

        if let Some(i) = self.position(Action::Remove, kind, &entity.id) {
            self.pending.remove(i);
            return;
        }

        let queued = self.position(Action::Add, kind, &entity.id).is_some();
        if queued || self.baseline.contains(kind, &entity.id) {
            return;
        }

        self.pending.push(Participant::Add { kind, entity });
    }

    /// Withdraw access for `id` as `kind`.
    ///
    /// Removing something that was never there is a no-op.
    /// `ParticipantType::Public` is treated as `set_public(false)`.
    pub fn remove(&mut self, kind: ParticipantType, id: &EntityId) {
        if kind == ParticipantType::Public {
            return self.set_public(false);
        }

        if let Some(i) = self.position(Action::Add, kind, id) {
            self.pending.remove(i);
            return;
        }

        let queued = self.position(Action::Remove, kind, id).is_some();
        if queued || !self.baseline.contains(kind, id) {
            return;
        }

        self.pending.push(Participant::Remove {
            kind,
            id: id.clone(),
        });
    }

    /// Make the document public or private.
    pub fn set_public(&mut self, value: bool) {
        let toggle = self
            .pending
            .iter()
            .position(|p| p.kind() == ParticipantType::Public);

        match toggle {
            Some(i) => {
                let queued_value = self.pending[i].action() == Action::Add;
                if queued_value != value {
                    self.pending.remove(i);
                }
            }
            None if value != self.baseline.public => {
                self.pending.push(if value {
                    Participant::AddPublic
                } else {
                    Participant::RemovePublic
                });
            }
            None => {}
        }
    }

    /// Whether any queued mutation needs the document key.
    pub fn requires_document_key(&self) -> bool {
        self.pending.iter().any(Participant::requires_document_key)
    }

    /// Whether any queued mutation needs a sender private key.
    pub fn requires_sender_key(&self) -> bool {
        self.pending.iter().any(Participant::requires_sender_key)
    }

    /// Resolve the queue into wire records.
    ///
    /// Every `add` gets a key: sealed from `sender` to the entity, or for
    /// `public` the document key itself. Entities' public keys are dropped.
    pub fn resolve(
        self,
        provider: &dyn CryptoProvider,
        document_key: Option<&DocumentKey>,
        sender: Option<&PrivateKey>,
    ) -> Result<Vec<ParticipantRecord>> {
        self.pending
            .into_iter()
            .map(|participant| resolve_one(provider, participant, document_key, sender))
            .collect()
    }

    fn position(&self, action: Action, kind: ParticipantType, id: &EntityId) -> Option<usize> {
        self.pending
            .iter()
            .position(|p| p.action() == action && p.targets(kind, id))
    }
}

fn resolve_one(
    provider: &dyn CryptoProvider,
    participant: Participant,
    document_key: Option<&DocumentKey>,
    sender: Option<&PrivateKey>,
) -> Result<ParticipantRecord> {
    let action = participant.action();
    let kind = participant.kind();

    let record = match participant {
        Participant::Add { entity, .. } => {
            let document_key = document_key.ok_or(PermsError::MissingDocumentKey)?;
            let sender = sender.ok_or_else(|| PermsError::MissingPrivateKey(entity.id.clone()))?;
            let key = wrap_document_key(provider, document_key, sender, &entity)?;
            ParticipantRecord {
                action,
                kind,
                id: Some(entity.id),
                key: Some(key),
            }
        }
        Participant::AddPublic => {
            let document_key = document_key.ok_or(PermsError::MissingDocumentKey)?;
            ParticipantRecord {
                action,
                kind,
                id: None,
                key: Some(document_key.to_hex()),
            }
        }
        Participant::Remove { id, .. } => ParticipantRecord {
            action,
            kind,
            id: Some(id),
            key: None,
        },
        Participant::RemovePublic => ParticipantRecord {
            action,
            kind,
            id: None,
            key: None,
        },
    };

    Ok(record)
}
