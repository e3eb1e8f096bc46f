//! Wiring of configuration, clients and stores.

use reelcast_config::{AccountMap, AssetMapping, Credentials, MediaSource, PersonaStore, ReelcastConfig};
use reelcast_error::ReelcastResult;
use reelcast_interface::PublishingApi;
use reelcast_models::{ImagineClient, XaiClient};
use reelcast_pipeline::{AssetLibrary, BatchOrchestrator, CopyGenerator, FfmpegEncoder, MediaBuilder};
use reelcast_publish::{LateClient, Publisher};
use reelcast_server::ApiState;
use reelcast_storage::DraftStore;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Loaded configuration plus the personas and account mapping it points at.
#[derive(Debug, Clone)]
pub struct Reelcast {
    config: ReelcastConfig,
    credentials: Credentials,
    personas: PersonaStore,
    accounts: AccountMap,
}

impl Reelcast {
    /// Load personas and the account mapping named by `config`.
    #[instrument(skip_all)]
    pub fn new(config: ReelcastConfig, credentials: Credentials) -> ReelcastResult<Self> {
        let personas = PersonaStore::load_dir(&config.paths.personas_dir)?;
        let accounts = AccountMap::load(&config.paths.accounts_file)?;
        Ok(Self {
            config,
            credentials,
            personas,
            accounts,
        })
    }

    /// Layered configuration and environment credentials.
    pub fn from_env() -> ReelcastResult<Self> {
        Self::new(ReelcastConfig::load()?, Credentials::from_env())
    }

    /// Settings in use.
    pub fn config(&self) -> &ReelcastConfig {
        &self.config
    }

    /// API credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Loaded personas.
    pub fn personas(&self) -> &PersonaStore {
        &self.personas
    }

    /// Account-to-profile mapping.
    pub fn accounts(&self) -> &AccountMap {
        &self.accounts
    }

    /// Open (creating if needed) the draft tree.
    pub fn open_store(&self) -> ReelcastResult<Arc<DraftStore>> {
        Ok(Arc::new(DraftStore::new(&self.config.paths.drafts_dir)?))
    }

    /// Media builder for the configured source. In library mode the Imagine
    /// client is still attached but never called.
    pub fn media_builder(&self, xai_key: &str) -> ReelcastResult<MediaBuilder> {
        let media = &self.config.media;
        let generator = ImagineClient::new(xai_key, self.config.imagine.clone(), self.config.http)?;
        let builder = MediaBuilder::new(
            Arc::new(generator),
            Arc::new(FfmpegEncoder::new(media)),
            media.clone(),
        );
        if media.source == MediaSource::Library {
            let mapping = AssetMapping::load(&self.config.paths.asset_mapping_file)?;
            info!(keys = mapping.keys().len(), "Using asset library");
            Ok(builder.with_library(AssetLibrary::new(&self.config.paths.assets_dir, mapping)))
        } else {
            Ok(builder)
        }
    }

    /// Orchestrator writing to `store`. Fails without an xAI key.
    pub fn orchestrator(&self, store: Arc<DraftStore>) -> ReelcastResult<BatchOrchestrator> {
        let key = self.credentials.require_xai()?;
        let text = XaiClient::new(key, self.config.xai.clone(), self.config.http)?;
        Ok(BatchOrchestrator::new(
            self.personas.clone(),
            CopyGenerator::new(Arc::new(text), store.clone()),
            self.media_builder(key)?,
            store,
            self.config.pipeline.clone(),
        ))
    }

    /// Publisher for `store`. Without a Late key every publish fails with a
    /// configuration error after the draft checks.
    pub fn publisher(&self, store: Arc<DraftStore>) -> ReelcastResult<Publisher> {
        let api = match self.credentials.require_late() {
            Ok(key) => {
                let client =
                    LateClient::new(key, self.config.publish.clone(), self.config.http)?;
                Some(Arc::new(client) as Arc<dyn PublishingApi>)
            }
            Err(e) => {
                warn!(error = %e.message, "Publishing disabled");
                None
            }
        };
        Ok(Publisher::new(
            store,
            self.accounts.clone(),
            api,
            self.config.publish.cross_post,
        ))
    }

    /// Review service state over one shared draft store.
    pub fn api_state(&self) -> ReelcastResult<ApiState> {
        let store = self.open_store()?;
        let orchestrator = self.orchestrator(store.clone())?;
        let publisher = self.publisher(store)?;
        Ok(ApiState::new(Arc::new(orchestrator), Arc::new(publisher)))
    }
}
