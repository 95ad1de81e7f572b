use crate::*;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::ser::Serialize;
use serde_json::{to_value, Value};
use std::collections::HashMap;
use tracing::debug;

/// A FrozenLake instance hosted by a gymnasium-http-api server.
/// NOTE: All APIs are sync as the server is expected to be local.
#[derive(Debug)]
pub struct HttpEnv {
    client: Client,
    api_url: String,
    instance_id: String,
}

impl HttpEnv {
    pub fn new(base_url: &str, env_id: &str, config: &EnvConfig) -> Result<Self> {
        let mut body = HashMap::<&str, Value>::from([
            ("env_id", Value::String(env_id.to_string())),
            ("max_episode_steps", to_value(config.max_episode_steps)?),
        ]);
        let kwargs = config.kwargs().into_iter().collect::<HashMap<_, _>>();
        body.insert("kwargs", to_value(kwargs)?);

        let client = Client::new(base_url)?;
        let url = client.make_api_url("");
        let obj = client.http_post(&url, &body)?;
        let instance_id = obj["instance_id"]
            .as_str()
            .ok_or_else(|| GymError::Protocol("no instance_id returned".to_string()))?;
        debug!(env_id, instance_id, "created remote environment");

        Ok(Self::reference(client, instance_id))
    }

    fn reference(client: Client, instance_id: &str) -> Self {
        let api_url = client.make_api_url(&format!("{instance_id}/"));
        Self {
            client,
            api_url,
            instance_id: instance_id.to_string(),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    fn make_api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }
}

impl Env for HttpEnv {
    fn reset(&mut self, seed: Option<u64>) -> Result<Discrete> {
        let mut body = HashMap::from([]);
        if let Some(seed) = seed {
            let _ = body.insert("seed", seed.to_string());
        }

        let url = self.make_api_url("reset/");
        let obj = self.client.http_post(&url, &body)?;
        discrete_observation(&obj["observation"])
    }

    fn step(&mut self, action: Action) -> Result<StepInfo> {
        let req = HashMap::from([("action", action.discrete_value())]);

        let url = self.make_api_url("step/");
        let obj = self.client.http_post(&url, &req)?;

        Ok(StepInfo {
            observation: discrete_observation(&obj["observation"])?,
            reward: field(&obj, "reward", Value::as_f64)?,
            truncated: field(&obj, "truncated", Value::as_bool)?,
            terminated: field(&obj, "terminated", Value::as_bool)?,
        })
    }

    fn render(&self) -> Result<RenderFrame> {
        let url = self.make_api_url("render/");
        let obj = self.client.http_get(&url)?;

        match &obj["render_frame"] {
            Value::String(s) => Ok(RenderFrame::Ansi(s.clone())),
            Value::Null => Ok(RenderFrame::None),
            other => Err(GymError::Protocol(format!(
                "unsupported render frame {other}"
            ))),
        }
    }
}

#[derive(Debug)]
struct Client {
    api_url: String,
    client: reqwest::blocking::Client,
}

impl Client {
    fn new(base_url: &str) -> Result<Self> {
        let mut base_url = base_url.replace("//localhost:", "//127.0.0.1:");
        if base_url.ends_with('/') {
            _ = base_url.remove(base_url.len() - 1);
        }

        let api_url = format!("{base_url}/v1/envs/");

        Ok(Self {
            api_url,
            client: reqwest::blocking::Client::builder().build()?,
        })
    }

    fn make_api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn http_get(&self, url: &str) -> Result<Value> {
        let res = self
            .client
            .get(url)
            .headers(Self::construct_common_headers())
            .send()?;
        Ok(res.error_for_status()?.json::<Value>()?)
    }

    fn http_post<T: Serialize>(&self, url: &str, body: &HashMap<&str, T>) -> Result<Value> {
        let res = self
            .client
            .post(url)
            .headers(Self::construct_common_headers())
            .json(body)
            .send()?;
        Ok(res.error_for_status()?.json::<Value>()?)
    }

    fn construct_common_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// The server reports observations either bare or wrapped in a one element array.
fn discrete_observation(val: &Value) -> Result<Discrete> {
    let val = match val.as_array() {
        Some(items) if items.len() == 1 => &items[0],
        _ => val,
    };

    val.as_i64()
        .map(|n| n as Discrete)
        .ok_or_else(|| GymError::Protocol(format!("expected a Discrete observation, got {val}")))
}

fn field<T>(obj: &Value, name: &str, get: fn(&Value) -> Option<T>) -> Result<T> {
    get(&obj[name]).ok_or_else(|| GymError::Protocol(format!("missing or malformed '{name}'")))
}
