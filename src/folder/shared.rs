//! Resources needed to read a public shared folder

use crate::codec::Operation;
use crate::error::ApiError;
use crate::file::SharedLink;
use crate::transport::{Request, Target};

impl crate::Client {
    /// List the files of a shared folder, from its public identifier
    #[tracing::instrument(skip(self))]
    pub async fn list_shared_folder(&self, share_id: &str) -> Result<Vec<SharedLink>, ApiError> {
        let url = format!(
            "{}/{}/{}",
            self.share_url.trim_end_matches('/'),
            Operation::SharedFolder.path(),
            share_id
        );
        let request = Request::get(Target::Url(url)).with_query("json", "1");
        self.call(Operation::SharedFolder, request).await
    }
}
