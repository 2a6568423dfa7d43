// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use crate::eth::Uint64;
use http::{HeaderMap, HeaderValue, header};
use jsonrpsee::core::ClientError;
use jsonrpsee::core::client::ClientT as _;
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::core::traits::ToRpcParams;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::value::RawValue;
use url::Url;

/// JSON-RPC client for an Ethereum node, over HTTP(S) or WebSocket depending on the URL scheme.
pub struct RpcClient {
    url: Url,
    inner: ClientInner,
}

enum ClientInner {
    Ws(jsonrpsee::ws_client::WsClient),
    Https(jsonrpsee::http_client::HttpClient),
}

impl RpcClient {
    pub async fn from_url<'a>(
        url: &Url,
        token: impl Into<Option<&'a str>>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let headers = match token.into() {
            Some(it) => HeaderMap::from_iter([(
                header::AUTHORIZATION,
                match HeaderValue::from_str(&format!("Bearer {it}")) {
                    Ok(it) => it,
                    Err(e) => {
                        return Err(ClientError::Custom(format!(
                            "Invalid authorization token: {e}"
                        )));
                    }
                },
            )]),
            None => Default::default(),
        };
        let inner = match url.scheme() {
            "ws" | "wss" => ClientInner::Ws(
                jsonrpsee::ws_client::WsClientBuilder::new()
                    .set_headers(headers)
                    .request_timeout(timeout)
                    .build(url.as_str())
                    .await?,
            ),
            "http" | "https" => ClientInner::Https(
                jsonrpsee::http_client::HttpClientBuilder::new()
                    .set_headers(headers)
                    .request_timeout(timeout)
                    .build(url.as_str())?,
            ),
            it => return Err(ClientError::Custom(format!("Unsupported URL scheme: {it}"))),
        };
        Ok(Self {
            url: url.clone(),
            inner,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: impl ToRpcParams + Send,
    ) -> Result<R, RpcError> {
        tracing::trace!(method, "rpc request");
        let result = match &self.inner {
            ClientInner::Ws(it) => it.request(method, params).await,
            ClientInner::Https(it) => it.request(method, params).await,
        };
        result.map_err(|source| RpcError::Call { method, source })
    }
}

/// Positional parameters, serialized once up front. Tuples serialize as JSON arrays.
struct RawParams(Box<RawValue>);

impl ToRpcParams for RawParams {
    fn to_rpc_params(self) -> Result<Option<Box<RawValue>>, serde_json::Error> {
        Ok(Some(self.0))
    }
}

fn params(method: &'static str, values: impl Serialize) -> Result<RawParams, RpcError> {
    serde_json::value::to_raw_value(&values)
        .map(RawParams)
        .map_err(|source| RpcError::Params { method, source })
}

#[async_trait]
impl EthRpc for RpcClient {
    async fn chain_id(&self) -> Result<EthChainId, RpcError> {
        let id: Uint64 = self.request(ETH_CHAIN_ID, ArrayParams::new()).await?;
        Ok(id.0)
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        let number: Uint64 = self.request(ETH_BLOCK_NUMBER, ArrayParams::new()).await?;
        Ok(number.0)
    }

    async fn call(&self, to: EthAddress, data: EthBytes) -> Result<EthBytes, RpcError> {
        let request = CallRequest {
            from: None,
            to,
            data,
        };
        let params = params(ETH_CALL, (&request, Predefined::Latest))?;
        self.request(ETH_CALL, params).await
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<Log>, RpcError> {
        let params = params(ETH_GET_LOGS, (filter,))?;
        self.request(ETH_GET_LOGS, params).await
    }

    async fn transaction_count(&self, address: EthAddress) -> Result<u64, RpcError> {
        let params = params(
            ETH_GET_TRANSACTION_COUNT,
            (address, Predefined::Pending),
        )?;
        let count: Uint64 = self.request(ETH_GET_TRANSACTION_COUNT, params).await?;
        Ok(count.0)
    }

    async fn max_priority_fee_per_gas(&self) -> Result<U256, RpcError> {
        let fee: crate::eth::EthBigInt = self
            .request(ETH_MAX_PRIORITY_FEE_PER_GAS, ArrayParams::new())
            .await?;
        Ok(fee.0)
    }

    async fn base_fee_per_gas(&self) -> Result<U256, RpcError> {
        let params = params(
            ETH_GET_BLOCK_BY_NUMBER,
            (Predefined::Latest, false),
        )?;
        let block: Option<BlockFees> = self.request(ETH_GET_BLOCK_BY_NUMBER, params).await?;
        block
            .and_then(|it| it.base_fee_per_gas)
            .map(|it| it.0)
            .ok_or(RpcError::Malformed {
                method: ETH_GET_BLOCK_BY_NUMBER,
                reason: "latest block has no base fee (pre-London chain?)".into(),
            })
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, RpcError> {
        let params = params(ETH_ESTIMATE_GAS, (request,))?;
        let gas: Uint64 = self.request(ETH_ESTIMATE_GAS, params).await?;
        Ok(gas.0)
    }

    async fn send_raw_transaction(&self, raw: EthBytes) -> Result<Hash, RpcError> {
        let params = params(ETH_SEND_RAW_TRANSACTION, (raw,))?;
        self.request(ETH_SEND_RAW_TRANSACTION, params).await
    }

    async fn transaction_receipt(&self, hash: Hash) -> Result<Option<TxReceipt>, RpcError> {
        let params = params(ETH_GET_TRANSACTION_RECEIPT, (hash,))?;
        self.request(ETH_GET_TRANSACTION_RECEIPT, params).await
    }
}
