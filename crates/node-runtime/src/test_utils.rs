use std::path::Path;
use std::sync::Arc;

use as2_06_scheduler::MockTimeSource;
use async_trait::async_trait;
use shared_crypto::testing::FakeSmime;
use shared_types::{
    Headers, HttpTransport, OutboundRequest, PartnerRecord, TransportError, TransportResponse,
};

use crate::container::context::Collaborators;
use crate::container::NodeConfig;

/// MyCompany at `home`, with PartnerA as the only partner.
pub fn config(home: &Path) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.server.home = home.to_path_buf();
    config.company.as2id = "MyCompany".to_string();
    config.company.email = "as2@mycompany.example".to_string();
    let mut partner = PartnerRecord::new("PartnerA");
    partner.send_settings.url = "http://partner-a.example:10080".to_string();
    config.partners.push(partner);
    config
}

/// Answers every POST with an empty 200.
pub struct NullTransport;

#[async_trait]
impl HttpTransport for NullTransport {
    async fn post(&self, _request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status: 200,
            headers: Headers::new(),
            body: Vec::new(),
        })
    }
}

pub fn collaborators() -> Collaborators {
    Collaborators {
        smime: Arc::new(FakeSmime::new()),
        transport: Arc::new(NullTransport),
        time: Arc::new(MockTimeSource::new(0)),
    }
}
