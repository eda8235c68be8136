//! Transaction stage lookups with endpoint fallback

use swap_api::stages::{tx_stages_path, TxStagesResponse};
use tracing::warn;

use super::ThornodeClient;
use crate::{error::SwapClientError, settlement::SettlementId};

impl ThornodeClient {
    /// Fetch the stages of a settlement, trying the mirror before the
    /// canonical endpoint
    pub async fn get_tx_stages(
        &self,
        settlement_id: &SettlementId,
    ) -> Result<TxStagesResponse, SwapClientError> {
        let path = tx_stages_path(settlement_id.as_str());

        let mirror_url = Self::build_url(&self.stages_mirror_url, &path);
        let mirror_err = match self.send_get_request(self.http_client.get(mirror_url)).await {
            Ok(stages) => return Ok(stages),
            Err(e) => e,
        };
        warn!("stages mirror failed for {settlement_id}, falling back: {mirror_err}");

        let canonical_url = Self::build_url(&self.stages_canonical_url, &path);
        self.send_get_request(self.http_client.get(canonical_url)).await.map_err(|e| {
            SwapClientError::polling(format!(
                "all stages endpoints failed (mirror: {}, canonical: {})",
                mirror_err.message(),
                e.message()
            ))
        })
    }
}
