use crate::api::cancel::CancelableRequest;
use crate::api::client::ApiClient;
use crate::api::models::{
    AuthRequest, AuthRequestByCode, AuthResponse, CreateUserRequest, FcmRequest,
    GenerateCodeRequest, GenerateCodeResponse, RefreshRequest, Setting, SettingList,
    UpdateSettingRequest, UpdateUserRequest, UserList, UserProfile,
};
use crate::api::request::ApiRequestOptions;
use serde_json::Value;

/// Endpoints under `/auth`: sessions, users and settings
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/login`
    pub fn login(&self, request: &AuthRequest) -> CancelableRequest<AuthResponse> {
        self.client
            .send_json(ApiRequestOptions::post("/auth/login"), request)
    }

    /// `POST /auth/login-code`
    pub fn login_by_code(&self, request: &AuthRequestByCode) -> CancelableRequest<AuthResponse> {
        self.client
            .send_json(ApiRequestOptions::post("/auth/login-code"), request)
    }

    /// `POST /auth/refresh`
    pub fn refresh(&self, request: &RefreshRequest) -> CancelableRequest<AuthResponse> {
        self.client
            .send_json(ApiRequestOptions::post("/auth/refresh"), request)
    }

    /// `GET /auth/me`
    pub fn me(&self) -> CancelableRequest<UserProfile> {
        self.client.send(ApiRequestOptions::get("/auth/me"))
    }

    /// `GET /auth/user/list`
    pub fn list_users(&self) -> CancelableRequest<UserList> {
        self.client.send(ApiRequestOptions::get("/auth/user/list"))
    }

    /// `POST /auth/user`
    pub fn create_user(&self, request: &CreateUserRequest) -> CancelableRequest<Value> {
        self.client
            .send_json(ApiRequestOptions::post("/auth/user"), request)
    }

    /// `PATCH /auth/user`
    pub fn update_user(&self, request: &UpdateUserRequest) -> CancelableRequest<Value> {
        self.client
            .send_json(ApiRequestOptions::patch("/auth/user"), request)
    }

    /// `POST /auth/generate-code`
    pub fn generate_code(
        &self,
        request: &GenerateCodeRequest,
    ) -> CancelableRequest<GenerateCodeResponse> {
        self.client
            .send_json(ApiRequestOptions::post("/auth/generate-code"), request)
    }

    /// `POST /auth/fcm`
    pub fn register_fcm(&self, request: &FcmRequest) -> CancelableRequest<Value> {
        self.client
            .send_json(ApiRequestOptions::post("/auth/fcm"), request)
    }

    /// `GET /auth/settings`
    pub fn list_settings(&self) -> CancelableRequest<SettingList> {
        self.client.send(ApiRequestOptions::get("/auth/settings"))
    }

    /// `GET /auth/settings/{key_id}`
    pub fn get_setting(&self, key_id: &str) -> CancelableRequest<Setting> {
        self.client.send(
            ApiRequestOptions::get("/auth/settings/{key_id}").path_param("key_id", key_id),
        )
    }

    /// `POST /auth/settings`
    pub fn update_setting(&self, request: &UpdateSettingRequest) -> CancelableRequest<Value> {
        self.client
            .send_json(ApiRequestOptions::post("/auth/settings"), request)
    }
}
