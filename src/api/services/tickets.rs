use crate::api::cancel::CancelableRequest;
use crate::api::client::ApiClient;
use crate::api::models::{
    CreateTicketRequest, ReplyRequest, SolutionRequest, Ticket, TicketList, TicketStatusFilter,
    UpdateTicketRequest,
};
use crate::api::request::ApiRequestOptions;
use serde_json::Value;

/// Endpoints under `/tickets`
#[derive(Debug, Clone, Copy)]
pub struct TicketsService<'a> {
    client: &'a ApiClient,
}

impl<'a> TicketsService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /tickets`, optionally restricted to one status tab
    pub fn list(&self, status: Option<TicketStatusFilter>) -> CancelableRequest<TicketList> {
        self.client
            .send(ApiRequestOptions::get("/tickets").query_param("status", status))
    }

    /// `POST /tickets/create`
    pub fn create(&self, request: &CreateTicketRequest) -> CancelableRequest<Ticket> {
        self.client
            .send_json(ApiRequestOptions::post("/tickets/create"), request)
    }

    /// `GET /tickets/{ticketId}`
    pub fn get(&self, ticket_id: &str) -> CancelableRequest<Ticket> {
        self.client.send(
            ApiRequestOptions::get("/tickets/{ticketId}").path_param("ticketId", ticket_id),
        )
    }

    /// `PATCH /tickets/{ticketId}`
    pub fn update(
        &self,
        ticket_id: &str,
        request: &UpdateTicketRequest,
    ) -> CancelableRequest<Ticket> {
        self.client.send_json(
            ApiRequestOptions::patch("/tickets/{ticketId}").path_param("ticketId", ticket_id),
            request,
        )
    }

    /// `POST /tickets/{ticketId}/reply`
    ///
    /// The response shape varies between deployments, so it is left as raw
    /// JSON; fetch the ticket again to see the new reply.
    pub fn reply(&self, ticket_id: &str, request: &ReplyRequest) -> CancelableRequest<Value> {
        self.client.send_json(
            ApiRequestOptions::post("/tickets/{ticketId}/reply").path_param("ticketId", ticket_id),
            request,
        )
    }

    /// `PATCH /tickets/{ticketId}/solution`
    pub fn update_solution(
        &self,
        ticket_id: &str,
        request: &SolutionRequest,
    ) -> CancelableRequest<Ticket> {
        self.client.send_json(
            ApiRequestOptions::patch("/tickets/{ticketId}/solution")
                .path_param("ticketId", ticket_id),
            request,
        )
    }
}
