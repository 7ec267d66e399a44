use licicontrol::config::AppConfig;
use licicontrol::error::AppError;
use licicontrol::gateway::{ChatGateway, HttpChatGateway};
use licicontrol::store::{MemoryStore, PostgrestStore, RowStore};
use licicontrol::workflows::assistant::AssistantService;
use licicontrol::workflows::auditor::AuditorService;
use licicontrol::workflows::dashboard::DashboardService;
use licicontrol::workflows::documents::DocumentService;
use licicontrol::workflows::impugnation::ImpugnationService;
use licicontrol::workflows::pricing::{PncpClient, PricingService};
use licicontrol::workflows::processes::ProcessService;
use licicontrol::workflows::settings::SettingsService;
use licicontrol::workflows::transparency::TransparencyService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every workflow service, wired to one store and one gateway.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) auditor: Arc<AuditorService>,
    pub(crate) processes: Arc<ProcessService>,
    pub(crate) transparency: Arc<TransparencyService>,
    pub(crate) impugnation: Arc<ImpugnationService>,
    pub(crate) documents: Arc<DocumentService>,
    pub(crate) pricing: Arc<PricingService>,
    pub(crate) dashboard: Arc<DashboardService>,
    pub(crate) settings: Arc<SettingsService>,
    pub(crate) assistant: Arc<AssistantService>,
}

impl Services {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let store: Arc<dyn RowStore> = match &config.supabase {
            Some(supabase) => {
                info!(url = %supabase.url, "using supabase row store");
                Arc::new(PostgrestStore::new(supabase)?)
            }
            None => {
                warn!("SUPABASE_URL not set; rows are kept in memory and lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        let gateway = HttpChatGateway::new(&config.gateway)?;
        if gateway.is_configured() {
            info!(model = gateway.model(), "ai gateway configured");
        } else {
            warn!("AI_GATEWAY_API_KEY not set; AI-assisted endpoints will answer 503");
        }
        let gateway: Arc<dyn ChatGateway> = Arc::new(gateway);

        let pncp = PncpClient::new(&config.pncp)?;

        Ok(Self::assemble(store, gateway, pncp))
    }

    pub(crate) fn assemble(
        store: Arc<dyn RowStore>,
        gateway: Arc<dyn ChatGateway>,
        pncp: PncpClient,
    ) -> Self {
        Self {
            auditor: Arc::new(AuditorService::new(store.clone())),
            processes: Arc::new(ProcessService::new(store.clone(), gateway.clone())),
            transparency: Arc::new(TransparencyService::new(store.clone(), gateway.clone())),
            impugnation: Arc::new(ImpugnationService::new(store.clone(), gateway.clone())),
            documents: Arc::new(DocumentService::new(store.clone(), gateway.clone())),
            pricing: Arc::new(PricingService::new(store.clone(), pncp)),
            dashboard: Arc::new(DashboardService::new(store.clone(), gateway.clone())),
            settings: Arc::new(SettingsService::new(store)),
            assistant: Arc::new(AssistantService::new(gateway)),
        }
    }
}
