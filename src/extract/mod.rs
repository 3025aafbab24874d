//! Comment scraping for YouTube watch pages.
//!
//! The watch page gives us the client config (`ytcfg`) and the initial data
//! holding the comment section's first continuation. Every further page is
//! a POST to the innertube `next` endpoint with a continuation token.

mod comment_extract;
mod error_msgs;
pub mod helper;
mod youtube_extractor;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

pub use comment_extract::CommentPages;
pub use error_msgs::YoutubeError;
pub use youtube_extractor::{YoutubeExtractor, YOUTUBE_BASE_URL};

use crate::collector::CommentSource;
use crate::config::SortOrder;
use crate::models::CommentRecord;

impl CommentSource for YoutubeExtractor {
    fn comments(
        &self,
        url: &str,
        sort: SortOrder,
    ) -> BoxStream<'static, Result<CommentRecord, YoutubeError>> {
        let extractor = self.clone();
        let url = url.to_string();

        stream::once(async move { extractor.open_comments(&url, sort).await })
            .map_ok(CommentPages::into_stream)
            .try_flatten()
            .boxed()
    }
}
