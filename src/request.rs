use crate::codec::{self, Operation};
use crate::error::{ApiError, Error, RemoteError};
use crate::transport::{Request, Target};
use serde::de::DeserializeOwned;

/// Envelope returned by every mutating call
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct OperationResult {
    pub status: String,
    pub message: String,
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        self.status == codec::SUCCESS
    }
}

impl From<RemoteError> for OperationResult {
    fn from(value: RemoteError) -> Self {
        Self {
            status: value.status,
            message: value.message,
        }
    }
}

impl ApiError {
    /// The envelope sent back by the provider, when the failure comes from it
    pub fn operation_result(&self) -> Option<OperationResult> {
        self.as_remote().cloned().map(OperationResult::from)
    }
}

impl crate::Client {
    async fn send<T, D>(
        &self,
        operation: Operation,
        request: Request,
        decode: D,
    ) -> Result<T, Error>
    where
        D: Fn(Operation, &[u8]) -> Result<T, Error>,
    {
        let res = self.transport.send(request).await?;
        if !res.is_success() {
            return Err(codec::decode_failure(operation, res.status, &res.body).into());
        }
        decode(operation, &res.body)
    }

    async fn call_with<T, D>(
        &self,
        operation: Operation,
        request: Request,
        decode: D,
    ) -> Result<T, ApiError>
    where
        D: Fn(Operation, &[u8]) -> Result<T, Error> + Copy,
    {
        // a policy restricted to failures before any response stays restricted
        let policy = self
            .retry
            .with_idempotent(self.retry.idempotent && operation.is_idempotent());
        let request = &request;
        let result = policy
            .execute(operation, &self.classifier, &self.cancel, move || async move {
                self.send(operation, request.clone(), decode).await
            })
            .await?;
        tracing::debug!(attempts = result.attempts, "{operation} succeeded");
        Ok(result.value)
    }

    /// Sends the request through the retry policy configured for the operation
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: Request,
    ) -> Result<T, ApiError> {
        self.call_with(operation, request, codec::decode::<T>).await
    }

    /// Same as [`call`](Self::call), for the endpoints answering something else than json
    pub(crate) async fn call_ignoring_body(
        &self,
        operation: Operation,
        request: Request,
    ) -> Result<(), ApiError> {
        self.call_with(operation, request, |_, _| Ok(())).await
    }

    /// Encodes the parameters as the json body of a request to the operation's endpoint
    pub(crate) async fn post_json<P, T>(
        &self,
        operation: Operation,
        params: &P,
    ) -> Result<T, ApiError>
    where
        P: serde::Serialize,
        T: DeserializeOwned,
    {
        let body = codec::encode(params).map_err(|source| ApiError {
            operation,
            class: self.classifier.classify_error(&source),
            attempts: 0,
            source,
        })?;
        self.call(operation, Request::post_json(Target::Path(operation.path()), body))
            .await
    }
}
