//! Builders for creating and updating sealed documents.
//!
//! A builder is created per operation, configured through fluent calls,
//! and consumed by `build`. The private key is requested lazily: only when
//! a queued participant needs key material, and at most once per builder.
//!
//! The two flows share participant handling and key requesting. They
//! differ in where the document key comes from:
//!
//! - [`Create`]: a fresh random key, which also encrypts the file body
//! - [`Update`]: the original document's key, recovered with
//!   [`DocumentKeyResolver`]

use std::sync::Arc;

use tokio::sync::OnceCell;

use docseal_core::{CryptoProvider, Document, Entity, EntityId, PrivateKey, StandardCrypto};
use docseal_perms::{
    DocumentKey, DocumentKeyResolver, FileCipher, ParticipantDiff, ParticipantRecord,
    ParticipantSet, ParticipantType, PermsError,
};

use crate::config::DocSealConfig;
use crate::descriptor::{encode_content, CreateDescriptor, UpdateDescriptor};
use crate::error::{DocError, Result};
use crate::file::DocumentFile;
use crate::requester::KeyRequester;

/// Where a builder's document key comes from.
pub trait Flow: Send + Sync {
    /// Operation name used in logs.
    const NAME: &'static str;

    /// What is being built, for error messages.
    fn context(&self) -> String {
        Self::NAME.to_string()
    }

    /// Whether building `participants` needs the user's private key.
    fn requires_private_key(&self, participants: &ParticipantSet) -> bool;

    /// Produce the document key.
    ///
    /// `private_key` is `Some` whenever [`Flow::requires_private_key`]
    /// returned true.
    fn document_key(
        &self,
        provider: &dyn CryptoProvider,
        private_key: Option<&PrivateKey>,
    ) -> docseal_perms::Result<DocumentKey>;
}

/// Creation of a new document.
#[derive(Debug, Default)]
pub struct Create {
    file: Option<DocumentFile>,
}

impl Flow for Create {
    const NAME: &'static str = "create";

    // The key is fresh, so only wrapping for non-public entities needs it.
    fn requires_private_key(&self, participants: &ParticipantSet) -> bool {
        participants.requires_sender_key()
    }

    fn document_key(
        &self,
        provider: &dyn CryptoProvider,
        _private_key: Option<&PrivateKey>,
    ) -> docseal_perms::Result<DocumentKey> {
        DocumentKey::generate(provider)
    }
}

/// A delta against an existing document.
#[derive(Debug)]
pub struct Update {
    original: Document,
}

impl Flow for Update {
    const NAME: &'static str = "update";

    fn context(&self) -> String {
        format!("update of document {}", self.original.label())
    }

    fn requires_private_key(&self, participants: &ParticipantSet) -> bool {
        participants.requires_sender_key()
            || (participants.requires_document_key() && !self.original.public)
    }

    fn document_key(
        &self,
        provider: &dyn CryptoProvider,
        private_key: Option<&PrivateKey>,
    ) -> docseal_perms::Result<DocumentKey> {
        match private_key {
            Some(key) => DocumentKeyResolver::new(provider).resolve(&self.original, key),
            None if self.original.public => DocumentKeyResolver::resolve_public(&self.original),
            None => Err(PermsError::MissingDocumentKey),
        }
    }
}

/// Fluent builder shared by both flows.
pub struct DocumentBuilder<F> {
    flow: F,
    title: Option<String>,
    description: Option<String>,
    participants: ParticipantSet,
    requester: Option<Arc<dyn KeyRequester>>,
    key_cell: OnceCell<PrivateKey>,
    provider: Arc<dyn CryptoProvider>,
    config: DocSealConfig,
}

/// Builder for a new document.
pub type CreateDocument = DocumentBuilder<Create>;

/// Builder for changes to an existing document.
pub type UpdateDocument = DocumentBuilder<Update>;

impl<F: Flow> DocumentBuilder<F> {
    fn with_flow(flow: F, participants: ParticipantSet) -> Self {
        Self {
            flow,
            title: None,
            description: None,
            participants,
            requester: None,
            key_cell: OnceCell::new(),
            provider: Arc::new(StandardCrypto),
            config: DocSealConfig::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Register the source of the user's private key.
    pub fn key_requester(mut self, requester: Arc<dyn KeyRequester>) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Supply the private key directly; no requester will be consulted.
    pub fn with_private_key(mut self, key: PrivateKey) -> Self {
        self.key_cell = OnceCell::new_with(Some(key));
        self
    }

    /// Use a different crypto provider.
    pub fn with_crypto(mut self, provider: Arc<dyn CryptoProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_config(mut self, config: DocSealConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_observer(mut self, entity: Entity) -> Self {
        self.participants.add(ParticipantType::Observer, entity);
        self
    }

    pub fn add_observers(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        for entity in entities {
            self.participants.add(ParticipantType::Observer, entity);
        }
        self
    }

    pub fn remove_observer(mut self, id: impl Into<EntityId>) -> Self {
        self.participants.remove(ParticipantType::Observer, &id.into());
        self
    }

    pub fn add_workgroup(mut self, entity: Entity) -> Self {
        self.participants.add(ParticipantType::Workgroup, entity);
        self
    }

    pub fn add_workgroups(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        for entity in entities {
            self.participants.add(ParticipantType::Workgroup, entity);
        }
        self
    }

    pub fn remove_workgroup(mut self, id: impl Into<EntityId>) -> Self {
        self.participants.remove(ParticipantType::Workgroup, &id.into());
        self
    }

    /// Make the document readable by anyone holding its `filekey`.
    pub fn set_public(mut self, public: bool) -> Self {
        self.participants.set_public(public);
        self
    }

    /// The queued participant mutations.
    pub fn participants(&self) -> &ParticipantSet {
        &self.participants
    }

    /// Ask the requester for the private key, once.
    async fn request_private_key(&self) -> Result<&PrivateKey> {
        self.key_cell
            .get_or_try_init(|| async {
                let requester = self.requester.as_ref().ok_or_else(|| {
                    DocError::IllegalState(format!(
                        "{} needs a private key but no key requester is registered",
                        self.flow.context()
                    ))
                })?;

                tracing::debug!(operation = F::NAME, "requesting private key");
                requester
                    .request_key()
                    .await
                    .map_err(|source| DocError::KeyRequest {
                        operation: self.flow.context(),
                        source,
                    })
            })
            .await
    }

    /// The private key, if the queued participants need one.
    async fn sender_key(&self) -> Result<Option<PrivateKey>> {
        if !self.flow.requires_private_key(&self.participants) {
            return Ok(None);
        }
        self.request_private_key().await.map(|key| Some(key.clone()))
    }

    /// Resolve the queued participants into wire records.
    fn seal_participants(
        &mut self,
        document_key: Option<&DocumentKey>,
        sender: Option<&PrivateKey>,
    ) -> Result<Vec<ParticipantRecord>> {
        let participants = std::mem::take(&mut self.participants);
        let count = participants.len();
        let records = participants.resolve(self.provider.as_ref(), document_key, sender)?;
        tracing::debug!(operation = F::NAME, participants = count, "participants sealed");
        Ok(records)
    }
}

impl DocumentBuilder<Create> {
    pub fn new() -> Self {
        Self::with_flow(Create::default(), ParticipantSet::for_create())
    }

    /// The file to encrypt. Required.
    pub fn file(mut self, file: DocumentFile) -> Self {
        self.flow.file = Some(file);
        self
    }

    pub fn add_signer(mut self, entity: Entity) -> Self {
        self.participants.add(ParticipantType::Signer, entity);
        self
    }

    pub fn add_signers(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        for entity in entities {
            self.participants.add(ParticipantType::Signer, entity);
        }
        self
    }

    pub fn remove_signer(mut self, id: impl Into<EntityId>) -> Self {
        self.participants.remove(ParticipantType::Signer, &id.into());
        self
    }

    /// Encrypt the file and seal the document key to every participant.
    pub async fn build(mut self) -> Result<CreateDescriptor> {
        let file = self
            .flow
            .file
            .take()
            .ok_or_else(|| DocError::IllegalState("create needs a file".into()))?;

        let filename = file.name().to_string();
        let mime_type = file
            .mime_type()
            .map_or_else(|| self.config.default_mime_type.clone(), str::to_string);
        let bytes = file.read(self.config.max_file_size).await?;

        let sender = self.sender_key().await?;
        let document_key = self
            .flow
            .document_key(self.provider.as_ref(), sender.as_ref())?;
        let participants = self.seal_participants(Some(&document_key), sender.as_ref())?;

        let ciphertext = FileCipher::new(self.provider.as_ref()).encrypt(&bytes, &document_key)?;
        let raw_hash = self.provider.hash(&bytes);
        let hash = self.provider.hash(raw_hash.as_bytes());
        tracing::debug!(
            file = %filename,
            size = bytes.len(),
            hash = ?hash,
            "file encrypted"
        );

        Ok(CreateDescriptor {
            title: self.title,
            description: self.description.unwrap_or_default(),
            participants,
            content: encode_content(&ciphertext),
            raw_hash: raw_hash.to_hex(),
            hash: hash.to_hex(),
            filename,
            mime_type,
        })
    }
}

impl Default for DocumentBuilder<Create> {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder<Update> {
    pub fn new(original: Document) -> Self {
        let participants = ParticipantSet::for_update(&original);
        Self::with_flow(Update { original }, participants)
    }

    /// The document being updated.
    pub fn original(&self) -> &Document {
        &self.flow.original
    }

    /// Make the observer list equal to `observers`.
    ///
    /// Additions are queued before removals, each in list order.
    pub fn replace_observers(self, observers: &[Entity]) -> Self {
        let diff = ParticipantDiff::between(&self.flow.original.observers, observers);
        self.apply_diff(ParticipantType::Observer, diff)
    }

    /// Make the workgroup list equal to `workgroups`.
    pub fn replace_workgroups(self, workgroups: &[Entity]) -> Self {
        let diff = ParticipantDiff::between(&self.flow.original.workgroups, workgroups);
        self.apply_diff(ParticipantType::Workgroup, diff)
    }

    fn apply_diff(mut self, kind: ParticipantType, diff: ParticipantDiff) -> Self {
        tracing::debug!(
            document = self.flow.original.label(),
            kind = ?kind,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "participant list replaced"
        );
        for entity in diff.added {
            self.participants.add(kind, entity);
        }
        for entity in diff.removed {
            self.participants.remove(kind, &entity.id);
        }
        self
    }

    /// Produce the delta. The document key is recovered only if an
    /// addition needs it.
    pub async fn build(mut self) -> Result<UpdateDescriptor> {
        let sender = self.sender_key().await?;

        let document_key = if self.participants.requires_document_key() {
            let key = self
                .flow
                .document_key(self.provider.as_ref(), sender.as_ref())?;
            tracing::debug!(document = self.flow.original.label(), "document key resolved");
            Some(key)
        } else {
            None
        };

        let participants = self.seal_participants(document_key.as_ref(), sender.as_ref())?;

        Ok(UpdateDescriptor {
            title: self.title,
            description: self.description,
            participants,
        })
    }
}
