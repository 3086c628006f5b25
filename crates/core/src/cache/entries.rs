//! Request/response entries inside one named store.

use super::connection::CacheDb;
use super::hash::compute_entry_key;
use crate::Error;
use crate::http::{Request, Response, ResponseType};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;
use url::Url;

/// Method and URL of a stored request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryKey {
    pub method: String,
    pub url: String,
}

/// Row as read from SQLite, before URLs and headers are decoded.
struct RawEntry {
    response_url: String,
    status: i64,
    status_text: String,
    headers_json: String,
    body: Vec<u8>,
    response_type: String,
    redirected: bool,
}

impl RawEntry {
    fn decode(self) -> Result<Response, Error> {
        let url = Url::parse(&self.response_url).map_err(|e| Error::CorruptEntry(e.to_string()))?;
        let headers: Vec<(String, String)> = serde_json::from_str(&self.headers_json)?;
        let response_type = ResponseType::parse(&self.response_type)
            .ok_or_else(|| Error::CorruptEntry(format!("unknown response type {}", self.response_type)))?;
        let status = u16::try_from(self.status).map_err(|e| Error::CorruptEntry(e.to_string()))?;

        Ok(Response {
            url,
            status,
            status_text: self.status_text,
            headers,
            body: Bytes::from(self.body),
            response_type,
            redirected: self.redirected,
        })
    }
}

/// Encoded row ready for insertion.
struct NewEntry {
    key: String,
    method: String,
    url: String,
    response_url: String,
    status: i64,
    status_text: String,
    headers_json: String,
    body: Bytes,
    response_type: &'static str,
    redirected: bool,
}

impl NewEntry {
    fn encode(request: &Request, response: &Response) -> Result<Self, Error> {
        if !request.is_get() {
            return Err(Error::InvalidInput(format!("only GET requests can be stored, got {}", request.method)));
        }
        Ok(Self {
            key: compute_entry_key(&request.method, request.url.as_str()),
            method: request.method.to_ascii_uppercase(),
            url: request.url.to_string(),
            response_url: response.url.to_string(),
            status: i64::from(response.status),
            status_text: response.status_text.clone(),
            headers_json: serde_json::to_string(&response.headers)
                .map_err(|e| Error::InvalidInput(format!("unencodable headers: {e}")))?,
            body: response.body.clone(),
            response_type: response.response_type.as_str(),
            redirected: response.redirected,
        })
    }
}

const UPSERT_ENTRY: &str = "INSERT INTO entries (
        cache_name, key, method, url, response_url, status, status_text,
        headers_json, body, response_type, redirected, stored_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
    ON CONFLICT(cache_name, key) DO UPDATE SET
        response_url = excluded.response_url,
        status = excluded.status,
        status_text = excluded.status_text,
        headers_json = excluded.headers_json,
        body = excluded.body,
        response_type = excluded.response_type,
        redirected = excluded.redirected,
        stored_at = excluded.stored_at";

fn insert(conn: &rusqlite::Connection, store: &str, entry: &NewEntry, now: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        UPSERT_ENTRY,
        params![
            store,
            &entry.key,
            &entry.method,
            &entry.url,
            &entry.response_url,
            entry.status,
            &entry.status_text,
            &entry.headers_json,
            &entry.body[..],
            entry.response_type,
            entry.redirected as i32,
            now,
        ],
    )?;
    Ok(())
}

/// Handle to one named store.
///
/// Obtained from [`CacheDb::open_store`]. Cheap to clone; the handle does not
/// keep the store alive, so operations on a deleted store fail or miss.
#[derive(Clone, Debug)]
pub struct Store {
    db: CacheDb,
    name: String,
}

impl Store {
    pub(crate) fn new(db: CacheDb, name: String) -> Self {
        Self { db, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the stored response for `request`.
    ///
    /// Only `GET` requests ever match.
    pub async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        if !request.is_get() {
            return Ok(None);
        }
        let store = self.name.clone();
        let key = compute_entry_key(&request.method, request.url.as_str());
        let raw = self
            .db
            .conn
            .call(move |conn| -> Result<Option<RawEntry>, Error> {
                let result = conn.query_row(
                    "SELECT response_url, status, status_text, headers_json, body, response_type, redirected
                     FROM entries WHERE cache_name = ?1 AND key = ?2",
                    params![store, key],
                    |row| {
                        Ok(RawEntry {
                            response_url: row.get(0)?,
                            status: row.get(1)?,
                            status_text: row.get(2)?,
                            headers_json: row.get(3)?,
                            body: row.get(4)?,
                            response_type: row.get(5)?,
                            redirected: row.get::<_, i32>(6)? == 1,
                        })
                    },
                );

                match result {
                    Ok(raw) => Ok(Some(raw)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(RawEntry::decode).transpose()
    }

    /// Store `response` under `request`, replacing any previous entry.
    pub async fn put(&self, request: &Request, response: &Response) -> Result<(), Error> {
        let entry = NewEntry::encode(request, response)?;
        let store = self.name.clone();
        let now = chrono::Utc::now().to_rfc3339();
        self.db
            .conn
            .call(move |conn| insert(conn, &store, &entry, &now))
            .await
            .map_err(Error::from)
    }

    /// Store every pair in one transaction: either all land or none do.
    pub async fn put_all(&self, pairs: &[(Request, Response)]) -> Result<(), Error> {
        let entries = pairs
            .iter()
            .map(|(request, response)| NewEntry::encode(request, response))
            .collect::<Result<Vec<_>, _>>()?;
        let store = self.name.clone();
        let now = chrono::Utc::now().to_rfc3339();
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                for entry in &entries {
                    insert(&tx, &store, entry, &now)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Requests held in this store, in insertion order.
    pub async fn keys(&self) -> Result<Vec<EntryKey>, Error> {
        let store = self.name.clone();
        self.db
            .conn
            .call(move |conn| -> Result<Vec<EntryKey>, Error> {
                let mut stmt = conn.prepare("SELECT method, url FROM entries WHERE cache_name = ?1 ORDER BY rowid")?;
                let keys = stmt
                    .query_map(params![store], |row| Ok(EntryKey { method: row.get(0)?, url: row.get(1)? }))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }

    pub async fn len(&self) -> Result<u64, Error> {
        let store = self.name.clone();
        self.db
            .conn
            .call(move |conn| {
                conn.query_row("SELECT COUNT(*) FROM entries WHERE cache_name = ?1", params![store], |row| {
                    row.get::<_, i64>(0)
                })
            })
            .await
            .map(|count| count as u64)
            .map_err(Error::from)
    }

    pub async fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len().await? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Destination;

    fn url(path: &str) -> Url {
        Url::parse("https://blog.example").unwrap().join(path).unwrap()
    }

    fn ok_response(path: &str, body: &'static str) -> Response {
        Response {
            url: url(path),
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body: Bytes::from_static(body.as_bytes()),
            response_type: ResponseType::Basic,
            redirected: false,
        }
    }

    async fn store() -> Store {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_store("blog-cache-v1").await.unwrap()
    }

    #[tokio::test]
    async fn test_put_and_match() {
        let store = store().await;
        let request = Request::get(url("/"));
        let response = ok_response("/", "<h1>home</h1>");

        store.put(&request, &response).await.unwrap();

        let cached = store.match_request(&request).await.unwrap().unwrap();
        assert_eq!(cached, response);
    }

    #[tokio::test]
    async fn test_match_ignores_destination() {
        let store = store().await;
        store.put(&Request::get(url("/")), &ok_response("/", "home")).await.unwrap();

        let navigation = Request::new("GET", url("/"), Destination::Document);
        assert!(store.match_request(&navigation).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_match_missing() {
        let store = store().await;
        let result = store.match_request(&Request::get(url("/nope"))).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_rejects_non_get() {
        let store = store().await;
        let request = Request::new("POST", url("/comments"), Destination::Empty);
        let result = store.put(&request, &ok_response("/comments", "ok")).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_non_get_never_matches() {
        let store = store().await;
        store.put(&Request::get(url("/")), &ok_response("/", "home")).await.unwrap();

        let head = Request::new("HEAD", url("/"), Destination::Empty);
        assert!(store.match_request(&head).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = store().await;
        let request = Request::get(url("/"));
        store.put(&request, &ok_response("/", "first")).await.unwrap();
        store.put(&request, &ok_response("/", "second")).await.unwrap();

        let cached = store.match_request(&request).await.unwrap().unwrap();
        assert_eq!(&cached.body[..], b"second");
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_put_all_and_keys() {
        let store = store().await;
        let pairs = vec![
            (Request::get(url("/")), ok_response("/", "home")),
            (Request::get(url("/offline.html")), ok_response("/offline.html", "offline")),
        ];

        store.put_all(&pairs).await.unwrap();

        let keys = store.keys().await.unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].url, "https://blog.example/");
        assert_eq!(keys[1].url, "https://blog.example/offline.html");
        assert!(keys.iter().all(|k| k.method == "GET"));
    }

    #[tokio::test]
    async fn test_put_all_is_all_or_nothing() {
        let store = store().await;
        let pairs = vec![
            (Request::get(url("/")), ok_response("/", "home")),
            (Request::new("POST", url("/x"), Destination::Empty), ok_response("/x", "x")),
        ];

        assert!(store.put_all(&pairs).await.is_err());
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_stores_are_isolated() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let v1 = db.open_store("blog-cache-v1").await.unwrap();
        let v2 = db.open_store("blog-cache-v2").await.unwrap();
        let request = Request::get(url("/"));

        v1.put(&request, &ok_response("/", "old")).await.unwrap();

        assert!(v2.match_request(&request).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_store_drops_entries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let v1 = db.open_store("blog-cache-v1").await.unwrap();
        let request = Request::get(url("/"));
        v1.put(&request, &ok_response("/", "old")).await.unwrap();

        db.delete_store("blog-cache-v1").await.unwrap();

        assert!(v1.match_request(&request).await.unwrap().is_none());
        assert!(v1.put(&request, &ok_response("/", "late")).await.is_err());

        let reopened = db.open_store("blog-cache-v1").await.unwrap();
        assert!(reopened.is_empty().await.unwrap());
    }
}
