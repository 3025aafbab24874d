use std::collections::VecDeque;

use futures::stream::{self, Stream};
use reqwest::header::{ACCEPT, CONTENT_TYPE, ORIGIN, REFERER};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::SortOrder;
use crate::models::CommentRecord;

use super::error_msgs::YoutubeError;
use super::helper::{decode_continuation, parse_count, search_dict};
use super::youtube_extractor::default_client_context;
use super::YoutubeExtractor;

const COMMENT_SECTION_TARGETS: [&str; 3] = [
    "comments-section",
    "engagement-panel-comments-section",
    "shorts-engagement-panel-comments-section",
];

const REPLY_TARGET_PREFIX: &str = "comment-replies-item";

const DEFAULT_API_PATH: &str = "/youtubei/v1/next";

impl YoutubeExtractor {
    /// Loads the watch page and positions a comment cursor on the requested
    /// sort order. A video with comments turned off yields an empty cursor.
    pub async fn open_comments(
        &self,
        url: &str,
        sort: SortOrder,
    ) -> Result<CommentPages, YoutubeError> {
        let url = self.watch_url(url);
        let webpage = self.get_webpage(&url).await?;
        let ytcfg = self.extract_ytcfg(&webpage)?;
        let initial_data = self.extract_initial_data(&webpage)?;

        let Some(section_endpoint) = self.section_continuation(&initial_data) else {
            info!(url = %url, "video has no comment section");
            return Ok(CommentPages::new(self.clone(), ytcfg, VecDeque::new()));
        };

        let sort_menu = match self.sort_menu(&initial_data) {
            Some(menu) => menu,
            None => {
                let response = self.comments_request(&ytcfg, &section_endpoint).await?;
                self.check_server_error(&response)?;
                self.sort_menu(&response)
                    .ok_or(YoutubeError::SortMenuNotFound)?
            }
        };

        let endpoint = sort_menu
            .get(sort.menu_index())
            .and_then(|item| item.get("serviceEndpoint"))
            .cloned()
            .ok_or(YoutubeError::SortMenuNotFound)?;

        debug!(?sort, "comment cursor ready");
        Ok(CommentPages::new(self.clone(), ytcfg, VecDeque::from([endpoint])))
    }

    /// First continuation of the watch page's comment item section.
    pub fn section_continuation(&self, data: &Value) -> Option<Value> {
        search_dict(data, "itemSectionRenderer")
            .into_iter()
            .flat_map(|section| search_dict(section, "continuationItemRenderer"))
            .find_map(|renderer| renderer.get("continuationEndpoint").cloned())
    }

    pub fn sort_menu(&self, data: &Value) -> Option<Vec<Value>> {
        search_dict(data, "sortFilterSubMenuRenderer")
            .into_iter()
            .find_map(|menu| menu.get("subMenuItems")?.as_array().cloned())
    }

    pub fn check_server_error(&self, response: &Value) -> Result<(), YoutubeError> {
        match search_dict(response, "externalErrorMessage").first() {
            Some(message) => Err(YoutubeError::Server(
                message.as_str().unwrap_or_default().to_string(),
            )),
            None => Ok(()),
        }
    }

    pub async fn comments_request(
        &self,
        ytcfg: &Value,
        endpoint: &Value,
    ) -> Result<Value, YoutubeError> {
        let api_key = self.get_api_key(ytcfg)?;
        let api_path = self
            .get_text_from_path(endpoint, &["commandMetadata", "webCommandMetadata", "apiUrl"])
            .unwrap_or_else(|| DEFAULT_API_PATH.to_string());
        let continuation = self
            .get_text_from_path(endpoint, &["continuationCommand", "token"])
            .ok_or(YoutubeError::ContinuationNotFound)?;

        let context = ytcfg
            .get("INNERTUBE_CONTEXT")
            .cloned()
            .unwrap_or_else(default_client_context);

        let payload = json!({
            "context": context,
            "continuation": decode_continuation(&continuation)
        });

        let base_url = self.base_url();
        let response = self
            .client
            .post(format!("{base_url}{api_path}"))
            .query(&[("key", api_key.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(ORIGIN, base_url)
            .header(REFERER, format!("{base_url}/"))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        debug!(status = %response.status(), "continuation response");

        Ok(response.json::<Value>().await?)
    }

    /// Queues the continuations found in one response: next pages of the
    /// comment section go to the front, reply pagination to the back.
    pub fn queue_continuations(&self, response: &Value, pending: &mut VecDeque<Value>) {
        let actions = search_dict(response, "reloadContinuationItemsCommand")
            .into_iter()
            .chain(search_dict(response, "appendContinuationItemsAction"));

        for action in actions {
            let target = action
                .get("targetId")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let Some(items) = action.get("continuationItems").and_then(Value::as_array) else {
                continue;
            };

            for item in items {
                if COMMENT_SECTION_TARGETS.contains(&target) {
                    let endpoints = search_dict(item, "continuationEndpoint");
                    for endpoint in endpoints.into_iter().rev() {
                        pending.push_front(endpoint.clone());
                    }
                } else if target.starts_with(REPLY_TARGET_PREFIX) {
                    if let Some(command) = item
                        .get("continuationItemRenderer")
                        .and_then(|r| r.get("button"))
                        .and_then(|b| b.get("buttonRenderer"))
                        .and_then(|b| b.get("command"))
                    {
                        pending.push_back(command.clone());
                    }
                }
            }
        }
    }

    pub fn comment_extractor(&self, data: &Value) -> Vec<CommentRecord> {
        let Some(mutations) = data
            .get("frameworkUpdates")
            .and_then(|f| f.get("entityBatchUpdate"))
            .and_then(|e| e.get("mutations"))
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };

        let mut comments = Vec::new();

        for (index, mutation) in mutations.iter().enumerate() {
            let Some(payload) = mutation
                .get("payload")
                .and_then(|p| p.get("commentEntityPayload"))
            else {
                continue;
            };

            let Some(properties) = payload.get("properties") else {
                debug!(index, "comment payload without properties, skipping");
                continue;
            };

            let Some(comment_id) = self.get_text_from_path(properties, &["commentId"]) else {
                debug!(index, "comment payload without id, skipping");
                continue;
            };

            let author = payload.get("author").cloned().unwrap_or_default();
            let toolbar = payload.get("toolbar").cloned().unwrap_or_default();

            let text = self
                .get_text_from_path(properties, &["content", "content"])
                .unwrap_or_default();

            let like_count = self
                .get_text_from_path(&toolbar, &["likeCountNotliked"])
                .and_then(|count| parse_count(&count))
                .unwrap_or(0);

            let reply_count = self
                .get_text_from_path(&toolbar, &["replyCount"])
                .and_then(|count| parse_count(&count))
                .unwrap_or(0);

            let user_verified = author
                .get("isVerified")
                .and_then(Value::as_bool)
                .unwrap_or(false);

            comments.push(CommentRecord {
                is_reply: comment_id.contains('.'),
                comment_id,
                text,
                author: self
                    .get_text_from_path(&author, &["displayName"])
                    .unwrap_or_default(),
                channel_id: self
                    .get_text_from_path(&author, &["channelId"])
                    .unwrap_or_default(),
                user_verified,
                published_time: self
                    .get_text_from_path(properties, &["publishedTime"])
                    .unwrap_or_default(),
                like_count,
                reply_count,
            });
        }

        comments
    }
}

/// Cursor over a video's comments. Pages are requested only when the
/// buffered comments run out.
pub struct CommentPages {
    extractor: YoutubeExtractor,
    ytcfg: Value,
    pending: VecDeque<Value>,
    buffer: VecDeque<CommentRecord>,
    pages_fetched: usize,
}

impl CommentPages {
    fn new(extractor: YoutubeExtractor, ytcfg: Value, pending: VecDeque<Value>) -> Self {
        Self {
            extractor,
            ytcfg,
            pending,
            buffer: VecDeque::new(),
            pages_fetched: 0,
        }
    }

    pub async fn next_comment(&mut self) -> Result<Option<CommentRecord>, YoutubeError> {
        loop {
            if let Some(comment) = self.buffer.pop_front() {
                return Ok(Some(comment));
            }

            let Some(endpoint) = self.pending.pop_front() else {
                return Ok(None);
            };

            if self.pages_fetched > 0 && !self.extractor.options.request_delay.is_zero() {
                tokio::time::sleep(self.extractor.options.request_delay).await;
            }

            let response = self
                .extractor
                .comments_request(&self.ytcfg, &endpoint)
                .await?;
            self.extractor.check_server_error(&response)?;
            self.extractor
                .queue_continuations(&response, &mut self.pending);

            let comments = self.extractor.comment_extractor(&response);
            self.pages_fetched += 1;
            debug!(
                page = self.pages_fetched,
                comments = comments.len(),
                pending = self.pending.len(),
                "fetched comment page"
            );
            self.buffer.extend(comments);
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<CommentRecord, YoutubeError>> + Send {
        stream::try_unfold(self, |mut pages| async move {
            let next = pages.next_comment().await?;
            Ok::<_, YoutubeError>(next.map(|comment| (comment, pages)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> YoutubeExtractor {
        YoutubeExtractor::new().unwrap()
    }

    fn comment_mutation(id: &str, text: &str, likes: &str) -> Value {
        json!({
            "entityKey": format!("key-{id}"),
            "payload": {
                "commentEntityPayload": {
                    "properties": {
                        "commentId": id,
                        "content": {"content": text},
                        "publishedTime": "2 days ago"
                    },
                    "author": {
                        "channelId": "UC123",
                        "displayName": "@someone",
                        "isVerified": id == "UgA"
                    },
                    "toolbar": {
                        "likeCountNotliked": likes,
                        "replyCount": "3"
                    }
                }
            }
        })
    }

    #[test]
    fn test_comment_extractor_reads_mutations_in_order() {
        let response = json!({
            "frameworkUpdates": {
                "entityBatchUpdate": {
                    "mutations": [
                        comment_mutation("UgA", "first comment", "1.2K"),
                        {"payload": {"engagementToolbarStateEntityPayload": {}}},
                        comment_mutation("UgA.r1", "a reply", " "),
                    ]
                }
            }
        });

        let comments = extractor().comment_extractor(&response);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "first comment");
        assert_eq!(comments[0].like_count, 1200);
        assert_eq!(comments[0].reply_count, 3);
        assert_eq!(comments[0].author, "@someone");
        assert!(!comments[0].is_reply);
        assert!(comments[0].user_verified);
        assert_eq!(comments[1].like_count, 0);
        assert!(!comments[1].user_verified);
        assert!(comments[1].is_reply);
    }

    #[test]
    fn test_comment_extractor_without_mutations() {
        assert!(extractor().comment_extractor(&json!({})).is_empty());
    }

    #[test]
    fn test_queue_continuations_orders_section_before_replies() {
        let response = json!({
            "onResponseReceivedEndpoints": [
                {
                    "appendContinuationItemsAction": {
                        "targetId": "comment-replies-item-UgA",
                        "continuationItems": [
                            {"continuationItemRenderer": {"button": {"buttonRenderer": {"command": {"name": "more-replies"}}}}}
                        ]
                    }
                },
                {
                    "reloadContinuationItemsCommand": {
                        "targetId": "comments-section",
                        "continuationItems": [
                            {"commentThreadRenderer": {"replies": {"continuationEndpoint": {"name": "thread-replies"}}}},
                            {"continuationItemRenderer": {"continuationEndpoint": {"name": "next-page"}}}
                        ]
                    }
                }
            ]
        });

        let mut pending = VecDeque::from([json!({"name": "older"})]);
        extractor().queue_continuations(&response, &mut pending);

        let names: Vec<&str> = pending
            .iter()
            .filter_map(|ep| ep.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["next-page", "thread-replies", "older", "more-replies"]);
    }

    #[test]
    fn test_queue_continuations_ignores_other_targets() {
        let response = json!({
            "appendContinuationItemsAction": {
                "targetId": "watch-next-feed",
                "continuationItems": [
                    {"continuationItemRenderer": {"continuationEndpoint": {"name": "related"}}}
                ]
            }
        });
        let mut pending = VecDeque::new();
        extractor().queue_continuations(&response, &mut pending);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_section_continuation_and_sort_menu() {
        let data = json!({
            "contents": {
                "itemSectionRenderer": {
                    "contents": [
                        {"continuationItemRenderer": {"continuationEndpoint": {"continuationCommand": {"token": "section"}}}}
                    ]
                }
            },
            "header": {
                "sortFilterSubMenuRenderer": {
                    "subMenuItems": [
                        {"title": "Top", "serviceEndpoint": {"continuationCommand": {"token": "top"}}},
                        {"title": "Newest", "serviceEndpoint": {"continuationCommand": {"token": "new"}}}
                    ]
                }
            }
        });

        let yt = extractor();
        let section = yt.section_continuation(&data).unwrap();
        assert_eq!(section["continuationCommand"]["token"], "section");

        let menu = yt.sort_menu(&data).unwrap();
        let recent = &menu[SortOrder::Recent.menu_index()]["serviceEndpoint"];
        assert_eq!(recent["continuationCommand"]["token"], "new");
    }

    #[test]
    fn test_section_continuation_absent_when_comments_disabled() {
        let data = json!({"contents": {"itemSectionRenderer": {"contents": [{"messageRenderer": {}}]}}});
        assert!(extractor().section_continuation(&data).is_none());
    }

    #[test]
    fn test_check_server_error() {
        let yt = extractor();
        let response = json!({"actions": [{"externalErrorMessage": "Comments are turned off."}]});
        let err = yt.check_server_error(&response).unwrap_err();
        assert!(err.to_string().contains("Comments are turned off."));
        assert!(yt.check_server_error(&json!({"ok": true})).is_ok());
    }

    #[tokio::test]
    async fn test_empty_cursor_yields_nothing() {
        let mut pages = CommentPages::new(extractor(), json!({}), VecDeque::new());
        assert!(pages.next_comment().await.unwrap().is_none());
    }
}
