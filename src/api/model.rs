use serde::{Deserialize, Serialize};

use crate::sim::{CharacterId, SiteId};

#[derive(Deserialize, Debug, Clone)]
pub struct ApiRequest {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BuildParams {
    pub blueprint: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WorkerParams {
    pub site: SiteId,
    pub character: CharacterId,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TickParams {
    #[serde(default = "one")]
    pub count: u32,
}

fn one() -> u32 {
    1
}

/// A request with its params decoded for the named method.
#[derive(Debug, Clone)]
pub enum Method {
    Snapshot,
    Catalog,
    Pause,
    Resume,
    Tick(TickParams),
    Build(BuildParams),
    Assign(WorkerParams),
    Unassign(WorkerParams),
}

impl Method {
    pub fn parse(request: &ApiRequest) -> Result<Self, String> {
        let params = || {
            if request.params.is_null() {
                serde_json::Value::Object(Default::default())
            } else {
                request.params.clone()
            }
        };
        let decode = |e: serde_json::Error| format!("invalid params for {}: {}", request.method, e);

        Ok(match request.method.as_str() {
            "snapshot" => Method::Snapshot,
            "catalog" => Method::Catalog,
            "pause" => Method::Pause,
            "resume" => Method::Resume,
            "tick" => Method::Tick(serde_json::from_value(params()).map_err(decode)?),
            "build" => Method::Build(serde_json::from_value(params()).map_err(decode)?),
            "assign" => Method::Assign(serde_json::from_value(params()).map_err(decode)?),
            "unassign" => Method::Unassign(serde_json::from_value(params()).map_err(decode)?),
            other => return Err(format!("unknown method: {other}")),
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success(id: &str, result: serde_json::Value) -> Self {
        Self {
            id: id.to_string(),
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: &str, error: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            ok: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &str) -> ApiRequest {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_parse_methods() {
        let build = request(r#"{"id": "1", "method": "build", "params": {"blueprint": "House"}}"#);
        assert!(matches!(Method::parse(&build), Ok(Method::Build(p)) if p.blueprint == "House"));

        let tick = request(r#"{"id": "2", "method": "tick"}"#);
        assert!(matches!(Method::parse(&tick), Ok(Method::Tick(TickParams { count: 1 }))));

        let assign = request(r#"{"id": "3", "method": "assign", "params": {"site": 0, "character": 1}}"#);
        assert!(matches!(
            Method::parse(&assign),
            Ok(Method::Assign(WorkerParams { site: SiteId(0), character: CharacterId(1) }))
        ));
    }

    #[test]
    fn test_parse_errors() {
        let unknown = request(r#"{"id": "1", "method": "demolish"}"#);
        assert_eq!(Method::parse(&unknown).unwrap_err(), "unknown method: demolish");

        let missing = request(r#"{"id": "2", "method": "build"}"#);
        assert!(Method::parse(&missing).unwrap_err().starts_with("invalid params for build"));
    }

    #[test]
    fn test_failure_omits_result() {
        let json = serde_json::to_value(ApiResponse::failure("9", "nope")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "9", "ok": false, "error": "nope"}));
    }
}
