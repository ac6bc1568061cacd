//! User operations.

use async_trait::async_trait;

use crate::client::CitbbsClient;
use crate::errors::CitbbsResult;
use crate::pagination::{ListOption, ListOptions, DEFAULT_PER_PAGE};
use crate::transport::Method;
use crate::types::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, User,
    UserDeletionRequest, UsersResponse,
};

/// Users service trait.
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a user.
    async fn create(&self, request: &CreateUserRequest) -> CitbbsResult<User>;

    /// Gets a single user.
    async fn get(&self, request: &GetUserRequest) -> CitbbsResult<User>;

    /// Lists the users of an organization.
    ///
    /// Starts from `per_page=100`; `options` are applied in order on top.
    async fn list(
        &self,
        request: &ListUsersRequest,
        options: Vec<ListOption>,
    ) -> CitbbsResult<Vec<User>>;

    /// Deletes a user.
    ///
    /// Returns `None` when the API confirms the deletion without a body.
    async fn delete(
        &self,
        request: &DeleteUserRequest,
    ) -> CitbbsResult<Option<UserDeletionRequest>>;
}

/// Users service backed by a [`CitbbsClient`].
pub struct DefaultUsersService<'a> {
    client: &'a CitbbsClient,
}

impl<'a> DefaultUsersService<'a> {
    /// Creates a new users service.
    pub fn new(client: &'a CitbbsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UsersService for DefaultUsersService<'_> {
    async fn create(&self, request: &CreateUserRequest) -> CitbbsResult<User> {
        let path = user_path(&request.name);
        let req = self
            .client
            .new_request(Method::Post, &path, Some(request))
            .map_err(|e| e.with_context("error creating request for create user"))?;

        self.client.execute(req).await
    }

    async fn get(&self, request: &GetUserRequest) -> CitbbsResult<User> {
        let path = user_path(&request.user);
        let req = self
            .client
            .new_request(Method::Get, &path, Option::<&()>::None)
            .map_err(|e| e.with_context("error creating request for get user"))?;

        self.client.execute(req).await
    }

    async fn list(
        &self,
        request: &ListUsersRequest,
        options: Vec<ListOption>,
    ) -> CitbbsResult<Vec<User>> {
        let mut list_options = ListOptions::with_defaults([ListOption::PerPage(DEFAULT_PER_PAGE)]);
        list_options.apply_all(options);

        let req = list_options
            .append_to(&users_api_path(&request.organization))
            .and_then(|path| {
                self.client
                    .new_request(Method::Get, &path, Option::<&()>::None)
            })
            .map_err(|e| e.with_context("error creating http request"))?;

        let response: UsersResponse = self.client.execute(req).await?;
        Ok(response.users)
    }

    async fn delete(
        &self,
        request: &DeleteUserRequest,
    ) -> CitbbsResult<Option<UserDeletionRequest>> {
        let path = user_path(&request.user);
        let req = self
            .client
            .new_request(Method::Delete, &path, Option::<&()>::None)
            .map_err(|e| e.with_context("error creating request for delete user"))?;

        self.client.execute_optional(req).await
    }
}

// Single-user paths carry no organization segment.
fn user_path(user: &str) -> String {
    format!("users/{}", user)
}

fn users_api_path(org: &str) -> String {
    format!("v1/organizations/{}/users", org)
}
