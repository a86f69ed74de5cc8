//! File-based todo storage implementation
//!
//! Stores todos as a JSON array in a file on disk.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use super::model::{NewTodo, Todo, TodoId, TodoPatch};
use super::repository::{ListOrder, TodoRepository};
use crate::{Error, Result};

/// File-based todo store using JSON
pub struct FileTodoStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache of todos
    cache: RwLock<HashMap<TodoId, Todo>>,
}

impl FileTodoStore {
    /// Create a new FileTodoStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                let todos: Vec<Todo> = serde_json::from_str(&content)?;
                todos.into_iter().map(|t| (t.id.clone(), t)).collect()
            }
        } else {
            HashMap::new()
        };

        debug!(path = %path.display(), count = cache.len(), "loaded todo store");

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Write a snapshot to disk
    ///
    /// Callers hold the cache write guard for the whole call, so writes never
    /// interleave. The snapshot lands in a sibling temp file first and is
    /// renamed over the real one.
    async fn persist(&self, snapshot: &HashMap<TodoId, Todo>) -> Result<()> {
        let todos = sorted(snapshot.values().cloned().collect(), ListOrder::OldestFirst);
        let content = serde_json::to_string_pretty(&todos)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, content).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            // the rename error is the one worth reporting
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn sorted(mut todos: Vec<Todo>, order: ListOrder) -> Vec<Todo> {
    // id breaks ties between todos created within the same clock tick
    todos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    if order == ListOrder::NewestFirst {
        todos.reverse();
    }
    todos
}

// Mutations edit a copy of the cache and only swap it in once the copy is on
// disk, so a failed write leaves memory matching the file.
#[async_trait]
impl TodoRepository for FileTodoStore {
    async fn list(&self, order: ListOrder) -> Result<Vec<Todo>> {
        let cache = self.cache.read().await;
        Ok(sorted(cache.values().cloned().collect(), order))
    }

    async fn create(&self, input: NewTodo) -> Result<Todo> {
        let todo = Todo::new(input.title);
        let mut cache = self.cache.write().await;
        if cache.contains_key(&todo.id) {
            return Err(Error::Storage(format!(
                "Todo with ID {} already exists",
                todo.id
            )));
        }

        let mut next = cache.clone();
        next.insert(todo.id.clone(), todo.clone());
        self.persist(&next).await?;
        *cache = next;

        debug!(id = %todo.id, "created todo");
        Ok(todo)
    }

    async fn update(&self, id: &str, patch: TodoPatch) -> Result<Todo> {
        let mut cache = self.cache.write().await;
        let mut updated = cache
            .get(id)
            .cloned()
            .ok_or_else(|| Error::TodoNotFound(id.to_string()))?;
        updated.apply(patch);

        let mut next = cache.clone();
        next.insert(updated.id.clone(), updated.clone());
        self.persist(&next).await?;
        *cache = next;

        debug!(id = %updated.id, completed = updated.completed, "updated todo");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut cache = self.cache.write().await;
        if !cache.contains_key(id) {
            return Err(Error::TodoNotFound(id.to_string()));
        }

        let mut next = cache.clone();
        next.remove(id);
        self.persist(&next).await?;
        *cache = next;

        debug!(id, "deleted todo");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (FileTodoStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");
        let store = FileTodoStore::new(&path).await.unwrap();
        (store, temp_dir)
    }

    fn new_todo(title: &str) -> NewTodo {
        NewTodo {
            title: title.to_string(),
        }
    }

    async fn find(store: &FileTodoStore, id: &str) -> Option<Todo> {
        store
            .list(ListOrder::default())
            .await
            .unwrap()
            .into_iter()
            .find(|t| t.id == id)
    }

    /// A store whose parent "directory" is a regular file, so every write fails
    async fn unwritable_store() -> (FileTodoStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        tokio::fs::write(&blocker, "not a directory").await.unwrap();
        let store = FileTodoStore::new(blocker.join("todos.json")).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_create_todo() {
        let (store, _temp) = create_test_store().await;

        let created = store.create(new_todo("Buy milk")).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.title, "Buy milk");
        assert!(!created.completed);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_created_todo_is_listed() {
        let (store, _temp) = create_test_store().await;

        let created = store.create(new_todo("Buy milk")).await.unwrap();

        assert_eq!(find(&store, &created.id).await, Some(created));
        assert!(find(&store, "missing").await.is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_created_at() {
        let (store, _temp) = create_test_store().await;

        let first = store.create(new_todo("Todo 1")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.create(new_todo("Todo 2")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let third = store.create(new_todo("Todo 3")).await.unwrap();

        let newest: Vec<_> = store
            .list(ListOrder::NewestFirst)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(newest.len(), 3);
        assert_eq!(newest.first(), Some(&third.id));
        assert_eq!(newest.last(), Some(&first.id));

        let oldest: Vec<_> = store
            .list(ListOrder::OldestFirst)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(oldest, newest.into_iter().rev().collect::<Vec<_>>());
        assert!(oldest.contains(&second.id));
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (store, _temp) = create_test_store().await;
        assert!(store.list(ListOrder::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_todo() {
        let (store, _temp) = create_test_store().await;

        let created = store.create(new_todo("Original title")).await.unwrap();

        let updated = store
            .update(&created.id, TodoPatch::completed(true))
            .await
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Original title");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let renamed = store
            .update(&created.id, TodoPatch::title("Updated title"))
            .await
            .unwrap();
        assert_eq!(renamed.title, "Updated title");
        assert!(renamed.completed);

        // Verify persistence
        let retrieved = find(&store, &created.id).await.unwrap();
        assert_eq!(retrieved.title, "Updated title");
    }

    #[tokio::test]
    async fn test_update_nonexistent_todo() {
        let (store, _temp) = create_test_store().await;
        store.create(new_todo("Keep me")).await.unwrap();

        let result = store.update("missing", TodoPatch::completed(true)).await;

        match result.unwrap_err() {
            Error::TodoNotFound(id) => assert_eq!(id, "missing"),
            e => panic!("Expected TodoNotFound error, got: {:?}", e),
        }

        let todos = store.list(ListOrder::default()).await.unwrap();
        assert_eq!(todos.len(), 1);
        assert!(!todos[0].completed);
    }

    #[tokio::test]
    async fn test_delete_todo() {
        let (store, _temp) = create_test_store().await;

        let created = store.create(new_todo("Todo to delete")).await.unwrap();

        store.delete(&created.id).await.unwrap();
        assert!(find(&store, &created.id).await.is_none());

        // Delete again should report not found
        let again = store.delete(&created.id).await.unwrap_err();
        assert!(again.is_not_found());
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("todos.json");

        let todo_id;

        // Create store and add todo
        {
            let store = FileTodoStore::new(&path).await.unwrap();
            let todo = store.create(new_todo("Persistent todo")).await.unwrap();
            store
                .update(&todo.id, TodoPatch::completed(true))
                .await
                .unwrap();
            todo_id = todo.id;
        }

        // Create new store instance and verify data persisted
        {
            let store = FileTodoStore::new(&path).await.unwrap();
            let todo = find(&store, &todo_id).await.unwrap();
            assert_eq!(todo.title, "Persistent todo");
            assert!(todo.completed);
        }
    }

    #[tokio::test]
    async fn test_empty_file_loads_as_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");
        tokio::fs::write(&path, "").await.unwrap();

        let store = FileTodoStore::new(&path).await.unwrap();
        assert!(store.list(ListOrder::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = FileTodoStore::new(&path).await;
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_store_unchanged() {
        let (store, _temp) = unwritable_store().await;

        assert!(store.create(new_todo("ghost")).await.is_err());
        assert!(store.list(ListOrder::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");
        let store = FileTodoStore::new(&path).await.unwrap();
        let kept = store.create(new_todo("Buy milk")).await.unwrap();

        // A directory in place of the temp file makes the next write fail
        tokio::fs::create_dir(temp_dir.path().join("todos.json.tmp"))
            .await
            .unwrap();

        assert!(store.update(&kept.id, TodoPatch::completed(true)).await.is_err());
        assert!(store.delete(&kept.id).await.is_err());
        assert!(store.create(new_todo("ghost")).await.is_err());

        assert_eq!(store.list(ListOrder::default()).await.unwrap(), vec![kept.clone()]);
        let reloaded = FileTodoStore::new(&path).await.unwrap();
        assert_eq!(reloaded.list(ListOrder::default()).await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_concurrent_writes_all_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("todos.json");
        let store = std::sync::Arc::new(FileTodoStore::new(&path).await.unwrap());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_todo(&format!("todo {i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let reloaded = FileTodoStore::new(&path).await.unwrap();
        assert_eq!(reloaded.list(ListOrder::default()).await.unwrap().len(), 16);
        assert!(!temp_dir.path().join("todos.json.tmp").exists());
    }
}
