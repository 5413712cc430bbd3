use std::{
    collections::{HashMap, VecDeque},
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use serde_json::{Value, json};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::{
    chat::{Conversation, OutboundMessage},
    error::{SheetError, SheetResult},
    pokeapi::ResourceSource,
};

pub const API_ROOT: &str = "https://pokeapi.test/api/v2";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves canned resources, anything unknown answers 404
#[derive(Default)]
pub struct FakeSource {
    resources: HashMap<String, Value>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: &str, value: Value) -> Self {
        self.resources.insert(target.to_string(), value);
        self
    }

    pub fn from_resources(resources: Vec<(String, Value)>) -> Self {
        Self {
            resources: resources.into_iter().collect(),
        }
    }
}

impl ResourceSource for FakeSource {
    fn fetch_json(&self, target: &str) -> impl Future<Output = SheetResult<Value>> + Send {
        let found = self.resources.get(target).cloned().ok_or(SheetError::Remote {
            status: 404,
            url: target.to_string(),
        });
        async move { found }
    }
}

/// Paths starting with this never get an answer
pub const STALL_PREFIX: &str = "/stall";

/// A reference API on a local port
///
/// Resources registered under `API_ROOT` URLs are served under the same
/// path, with every `API_ROOT` inside them rewritten to the local address.
/// Unknown paths answer 404.
pub struct FakeReferenceApi {
    pub base_url: String,
}

impl FakeReferenceApi {
    pub async fn serve(resources: Vec<(String, Value)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let routes: HashMap<String, String> = resources
            .into_iter()
            .map(|(target, value)| {
                let path = match target.strip_prefix(API_ROOT) {
                    Some(path) => path.to_string(),
                    None => format!("/{}", target.trim_start_matches('/')),
                };
                let body = value.to_string().replace(API_ROOT, &base_url);
                (path, body)
            })
            .collect();

        tokio::spawn(async move {
            let routes = Arc::new(routes);
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(answer(stream, routes.clone()));
            }
        });

        Self { base_url }
    }
}

async fn answer(mut stream: TcpStream, routes: Arc<HashMap<String, String>>) {
    let mut request: Vec<u8> = vec![];
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

    if path.starts_with(STALL_PREFIX) {
        tokio::time::sleep(Duration::from_secs(60)).await;
        return;
    }

    let (status, body) = match routes.get(&path) {
        Some(body) => ("200 OK", body.clone()),
        None => ("404 Not Found", r#"{"detail":"Not found."}"#.to_string()),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Answers prompts from a script, `None` stands for a timed out wait
#[derive(Default)]
pub struct ScriptedConversation {
    replies: Mutex<VecDeque<Option<String>>>,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl ScriptedConversation {
    pub fn new(replies: &[Option<&str>]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.map(str::to_string)).collect()),
            sent: Mutex::new(vec![]),
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|m| match m {
                OutboundMessage::Text(text) => Some(text),
                OutboundMessage::Image(_) => None,
            })
            .collect()
    }
}

impl Conversation for ScriptedConversation {
    fn send(&self, message: OutboundMessage) -> impl Future<Output = SheetResult<()>> + Send {
        self.sent.lock().unwrap().push(message);
        async { Ok(()) }
    }

    fn await_reply(&self, _timeout: Duration) -> impl Future<Output = Option<String>> + Send {
        let reply = self.replies.lock().unwrap().pop_front().flatten();
        async move { reply }
    }
}

pub fn ability_url(name: &str) -> String {
    format!("{}/ability/{}/", API_ROOT, name)
}

pub fn move_url(name: &str) -> String {
    format!("{}/move/{}/", API_ROOT, name)
}

/// A `pokemon/{name}` resource
///
/// `moves` are (name, learn method, level) triples, a move listed twice
/// gets both learn details.
pub fn creature_json(
    name: &str,
    stats: &[(&str, u32)],
    types: &[&str],
    abilities: &[(&str, bool)],
    moves: &[(&str, &str, u32)],
) -> Value {
    let mut move_slots: Vec<(String, Vec<Value>)> = vec![];
    for (move_name, method, level) in moves {
        let detail = json!({
            "level_learned_at": level,
            "move_learn_method": { "name": method, "url": "" }
        });
        match move_slots.iter_mut().find(|(n, _)| n == move_name) {
            Some((_, details)) => details.push(detail),
            None => move_slots.push((move_name.to_string(), vec![detail])),
        }
    }

    json!({
        "name": name,
        "stats": stats.iter().map(|(stat, value)| json!({
            "base_stat": value,
            "stat": { "name": stat, "url": "" }
        })).collect::<Vec<_>>(),
        "types": types.iter().enumerate().map(|(i, t)| json!({
            "slot": i + 1,
            "type": { "name": t, "url": "" }
        })).collect::<Vec<_>>(),
        "abilities": abilities.iter().map(|(ability, hidden)| json!({
            "is_hidden": hidden,
            "ability": { "name": ability, "url": ability_url(ability) }
        })).collect::<Vec<_>>(),
        "moves": move_slots.into_iter().map(|(move_name, details)| json!({
            "move": { "name": move_name, "url": move_url(&move_name) },
            "version_group_details": details
        })).collect::<Vec<_>>(),
        "sprites": { "other": { "official-artwork": {
            "front_default": format!("https://img.test/{}.png", name),
            "front_shiny": format!("https://img.test/shiny/{}.png", name)
        }}}
    })
}

pub fn seed_stats() -> Vec<(&'static str, u32)> {
    vec![
        ("hp", 45),
        ("attack", 49),
        ("defense", 49),
        ("special-attack", 65),
        ("special-defense", 65),
        ("speed", 45),
    ]
}

pub fn type_json(double_damage_from: &[&str]) -> Value {
    json!({
        "damage_relations": {
            "double_damage_from": double_damage_from
                .iter()
                .map(|t| json!({ "name": t, "url": "" }))
                .collect::<Vec<_>>()
        }
    })
}

pub fn move_json(kind: &str, class: &str, power: Option<u32>, accuracy: Option<u32>) -> Value {
    json!({
        "type": { "name": kind, "url": "" },
        "damage_class": { "name": class, "url": "" },
        "power": power,
        "accuracy": accuracy
    })
}

pub fn ability_json(name: &str, names: &[(&str, &str)], effects: &[(&str, &str)]) -> Value {
    json!({
        "name": name,
        "names": names.iter().map(|(lang, text)| json!({
            "name": text,
            "language": { "name": lang, "url": "" }
        })).collect::<Vec<_>>(),
        "effect_entries": effects.iter().map(|(lang, text)| json!({
            "short_effect": text,
            "effect": text,
            "language": { "name": lang, "url": "" }
        })).collect::<Vec<_>>()
    })
}

pub fn species_json(varieties: &[&str]) -> Value {
    json!({
        "varieties": varieties.iter().enumerate().map(|(i, v)| json!({
            "is_default": i == 0,
            "pokemon": { "name": v, "url": "" }
        })).collect::<Vec<_>>()
    })
}

/// Bulbasaur with two abilities, two reachable level-up moves and two types
///
/// The species resource is left out, so there are no alternate forms.
pub fn bulbasaur_resources() -> Vec<(String, Value)> {
    let moves = [
        ("tackle", "level-up", 1),
        ("vine-whip", "level-up", 3),
        ("razor-leaf", "level-up", 12),
        ("solar-beam", "machine", 0),
    ];

    vec![
        (
            "pokemon/bulbasaur".to_string(),
            creature_json(
                "bulbasaur",
                &seed_stats(),
                &["grass", "poison"],
                &[("overgrow", false), ("chlorophyll", true)],
                &moves,
            ),
        ),
        (
            ability_url("overgrow"),
            ability_json("overgrow", &[("en", "Overgrow")], &[("en", "Powers up Grass moves.")]),
        ),
        (
            ability_url("chlorophyll"),
            ability_json("chlorophyll", &[("en", "Chlorophyll")], &[("en", "Faster in sun.")]),
        ),
        (move_url("tackle"), move_json("normal", "physical", Some(40), Some(100))),
        (move_url("vine-whip"), move_json("grass", "physical", Some(45), Some(100))),
        ("type/grass".to_string(), type_json(&["fire", "ice", "flying", "bug"])),
        ("type/poison".to_string(), type_json(&["ground", "psychic"])),
    ]
}
