use serde::{Deserialize, Serialize};

use crate::models::application::Application;

#[derive(Debug, Clone, Serialize, Default)]
pub struct ApplicationListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
}

/// `/applications/all` answers with a bare list or with a page object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApplicationPage {
    Paged {
        applications: Vec<Application>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Bare(Vec<Application>),
}

impl ApplicationPage {
    pub fn into_items(self) -> Vec<Application> {
        match self {
            ApplicationPage::Paged { applications, .. } => applications,
            ApplicationPage::Bare(items) => items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignEmployeesPayload<'a> {
    pub employee_ids: Vec<&'a str>,
}
