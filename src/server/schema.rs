use crate::error::ChatError;
use crate::models::chat::{ ChatMessage, Conversation, ConversationStatus };
use crate::service::{ ConversationReply, ConversationService };

use async_graphql::{
    Context,
    EmptySubscription,
    Enum,
    ErrorExtensions,
    Object,
    Result,
    Schema,
    SimpleObject,
};

pub type ChatSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

impl ErrorExtensions for ChatError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Message")]
pub struct MessageObject {
    pub role: String,
    pub content: String,
    pub timestamp: i64,
}

impl From<ChatMessage> for MessageObject {
    fn from(msg: ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: msg.content,
            timestamp: msg.timestamp,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "ConversationStatus")]
pub enum StatusObject {
    AwaitingReply,
    Active,
}

impl From<ConversationStatus> for StatusObject {
    fn from(status: ConversationStatus) -> Self {
        match status {
            ConversationStatus::AwaitingReply => StatusObject::AwaitingReply,
            ConversationStatus::Active => StatusObject::Active,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Conversation")]
pub struct ConversationObject {
    pub conversation_id: String,
    pub messages: Vec<MessageObject>,
    pub status: StatusObject,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Conversation> for ConversationObject {
    fn from(conversation: Conversation) -> Self {
        let status = conversation.status().into();
        Self {
            conversation_id: conversation.id,
            messages: conversation.messages.into_iter().map(MessageObject::from).collect(),
            status,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct CreateOrUpdateConversationResponse {
    pub response: String,
    pub conversation_id: String,
}

impl From<ConversationReply> for CreateOrUpdateConversationResponse {
    fn from(reply: ConversationReply) -> Self {
        Self {
            response: reply.response,
            conversation_id: reply.conversation_id,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn get_all_conversations(&self, ctx: &Context<'_>) -> Result<Vec<ConversationObject>> {
        let service = ctx.data::<ConversationService>()?;
        Ok(
            service
                .get_all_conversations().await
                .into_iter()
                .map(ConversationObject::from)
                .collect()
        )
    }

    async fn get_conversation(
        &self,
        ctx: &Context<'_>,
        conversation_id: String
    ) -> Result<ConversationObject> {
        let service = ctx.data::<ConversationService>()?;
        service
            .get_conversation(&conversation_id).await
            .map(ConversationObject::from)
            .map_err(|e| e.extend())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_conversation(
        &self,
        ctx: &Context<'_>,
        query: String
    ) -> Result<CreateOrUpdateConversationResponse> {
        let service = ctx.data::<ConversationService>()?;
        service
            .create_conversation(&query).await
            .map(CreateOrUpdateConversationResponse::from)
            .map_err(|e| e.extend())
    }

    async fn update_conversation(
        &self,
        ctx: &Context<'_>,
        conversation_id: String,
        query: String
    ) -> Result<CreateOrUpdateConversationResponse> {
        let service = ctx.data::<ConversationService>()?;
        service
            .update_conversation(&conversation_id, &query).await
            .map(CreateOrUpdateConversationResponse::from)
            .map_err(|e| e.extend())
    }
}

pub fn build_schema(service: ConversationService) -> ChatSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription).data(service).finish()
}
