// SPDX-FileCopyrightText: 2026 Relayr Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram chat client for relayr.
//!
//! Implements [`ChatClient`] over the Telegram Bot API via teloxide:
//! long-polling subscription filtered to the configured source chats,
//! copy/forward/send delivery, and entity resolution.

pub mod errors;
pub mod inbound;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relayr_config::model::TelegramConfig;
use relayr_core::{ChatClient, ChatRef, Message, OutboundContent, RelayrError, SendError};
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, LinkPreviewOptions, Recipient,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::errors::map_send_error;

/// Telegram implementation of [`ChatClient`].
pub struct TelegramClient {
    bot: Bot,
    self_id: Option<i64>,
    polling_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl TelegramClient {
    /// Connects to Telegram and verifies the bot token via `getMe`.
    pub async fn connect(config: &TelegramConfig) -> Result<Self, RelayrError> {
        let token = config
            .bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RelayrError::Config("telegram.bot_token is required".into()))?;

        let bot = Bot::new(token);
        let me = bot.get_me().await.map_err(|e| RelayrError::Channel {
            message: format!("failed to authenticate bot: {e}"),
            source: Some(Box::new(e)),
        })?;

        info!(bot = me.username(), id = me.id.0, "connected to Telegram");

        Ok(Self {
            bot,
            self_id: Some(me.id.0 as i64),
            polling_handle: Mutex::new(None),
        })
    }

    /// Resolves a chat reference to its numeric id, querying the platform
    /// for `@handle` references.
    async fn resolve_id(&self, chat: &ChatRef) -> Result<i64, RelayrError> {
        match chat {
            ChatRef::Id(id) => Ok(*id),
            ChatRef::Handle(_) => {
                let info = self.bot.get_chat(recipient(chat)).await.map_err(|e| {
                    RelayrError::Channel {
                        message: format!("failed to resolve chat {chat}: {e}"),
                        source: Some(Box::new(e)),
                    }
                })?;
                Ok(info.id.0)
            }
        }
    }
}

impl Drop for TelegramClient {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.polling_handle.lock()
            && let Some(handle) = guard.take()
        {
            handle.abort();
        }
    }
}

#[async_trait]
impl ChatClient for TelegramClient {
    fn self_id(&self) -> Option<i64> {
        self.self_id
    }

    async fn subscribe(
        &self,
        sources: &[ChatRef],
    ) -> Result<mpsc::Receiver<Message>, RelayrError> {
        let mut allowed: HashSet<i64> = HashSet::new();
        for source in sources {
            match self.resolve_id(source).await {
                Ok(id) => {
                    allowed.insert(id);
                }
                Err(e) => {
                    warn!(chat = %source, error = %e, "cannot resolve source chat, skipping");
                }
            }
        }
        if allowed.is_empty() {
            return Err(RelayrError::Channel {
                message: "no source chat could be resolved".into(),
                source: None,
            });
        }

        let (tx, rx) = mpsc::channel(100);
        let bot = self.bot.clone();
        let allowed = Arc::new(allowed);

        info!(sources = allowed.len(), "starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = Update::filter_message().endpoint(
                move |msg: teloxide::types::Message| {
                    let tx = tx.clone();
                    let allowed = allowed.clone();
                    async move {
                        if !allowed.contains(&msg.chat.id.0) {
                            debug!(chat_id = msg.chat.id.0, "ignoring message from unwatched chat");
                            return respond(());
                        }

                        let message = inbound::to_message(&msg);
                        if tx.send(message).await.is_err() {
                            warn!("inbound channel closed, dropping message");
                        }
                        respond(())
                    }
                },
            );

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {}) // Silently ignore non-message updates
                .build()
                .dispatch()
                .await;
        });

        if let Ok(mut guard) = self.polling_handle.lock() {
            *guard = Some(handle);
        }

        Ok(rx)
    }

    async fn send(&self, target: &ChatRef, content: &OutboundContent) -> Result<(), SendError> {
        let to = recipient(target);
        let markup = keyboard(&content.buttons);

        if let Some(media) = content.media {
            // copyMessage keeps the source caption when none is supplied;
            // an explicit empty caption clears it.
            let mut request = self
                .bot
                .copy_message(
                    to,
                    Recipient::Id(ChatId(media.chat_id)),
                    teloxide::types::MessageId(media.message_id.0),
                )
                .caption(content.text.as_deref().unwrap_or_default());
            if let Some(markup) = markup {
                request = request.reply_markup(markup);
            }
            request.await.map(drop).map_err(map_send_error)
        } else {
            let text = content.text.as_deref().unwrap_or_default();
            let mut request = self.bot.send_message(to, text);
            if content.disable_link_preview {
                request = request.link_preview_options(disabled_preview());
            }
            if let Some(markup) = markup {
                request = request.reply_markup(markup);
            }
            request.await.map(drop).map_err(map_send_error)
        }
    }

    async fn forward_as_is(&self, target: &ChatRef, message: &Message) -> Result<(), SendError> {
        self.bot
            .forward_message(
                recipient(target),
                Recipient::Id(ChatId(message.chat_id)),
                teloxide::types::MessageId(message.id.0),
            )
            .await
            .map(drop)
            .map_err(map_send_error)
    }

    async fn resolve_chat(&self, chat: &ChatRef) -> Result<String, RelayrError> {
        let info = self
            .bot
            .get_chat(recipient(chat))
            .await
            .map_err(|e| {
                error!(chat = %chat, error = %e, "chat resolution failed");
                RelayrError::Channel {
                    message: format!("failed to resolve chat {chat}: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;

        Ok(info
            .title()
            .or_else(|| info.username())
            .map(str::to_string)
            .unwrap_or_else(|| info.id.to_string()))
    }
}

/// Converts a chat reference to a teloxide recipient.
fn recipient(chat: &ChatRef) -> Recipient {
    match chat {
        ChatRef::Id(id) => Recipient::Id(ChatId(*id)),
        ChatRef::Handle(handle) => Recipient::ChannelUsername(format!("@{handle}")),
    }
}

/// Builds the inline keyboard row, dropping buttons with unparseable URLs.
fn keyboard(buttons: &[relayr_core::LinkButton]) -> Option<InlineKeyboardMarkup> {
    if buttons.is_empty() {
        return None;
    }
    let row: Vec<InlineKeyboardButton> = buttons
        .iter()
        .filter_map(|b| match b.url.parse() {
            Ok(url) => Some(InlineKeyboardButton::url(b.label.clone(), url)),
            Err(e) => {
                warn!(label = %b.label, url = %b.url, error = %e, "invalid button URL, skipping");
                None
            }
        })
        .collect();
    (!row.is_empty()).then(|| InlineKeyboardMarkup::new([row]))
}

fn disabled_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}
