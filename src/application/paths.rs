//! Travel path use cases, including the next-destination operations

use std::sync::Arc;

use chrono::Utc;

use crate::application::errors::ApplicationError;
use crate::domain::entities::{Album, TravelPath};
use crate::domain::errors::DomainError;
use crate::domain::repositories::{IAlbumRepository, IPathRepository};
use crate::domain::value_objects::{AlbumId, PathId, UserId};

/// A path with both endpoint albums resolved for the response.
pub struct PathWithAlbums {
    pub path: TravelPath,
    pub from_album: Album,
    pub to_album: Album,
}

pub struct PathService {
    paths: Arc<dyn IPathRepository>,
    albums: Arc<dyn IAlbumRepository>,
}

impl PathService {
    pub fn new(paths: Arc<dyn IPathRepository>, albums: Arc<dyn IAlbumRepository>) -> Self {
        Self { paths, albums }
    }

    async fn get_owned_album(
        &self,
        album_id: &AlbumId,
        user_id: &UserId,
    ) -> Result<Album, ApplicationError> {
        let album = self
            .albums
            .find_by_id(album_id)
            .await?
            .ok_or_else(|| DomainError::AlbumNotFound {
                id: album_id.to_string(),
            })?;
        if album.user_id != *user_id {
            return Err(DomainError::AccessDenied { resource: "album" }.into());
        }
        Ok(album)
    }

    pub async fn create(
        &self,
        user_id: UserId,
        from_album_id: AlbumId,
        to_album_id: AlbumId,
    ) -> Result<PathWithAlbums, ApplicationError> {
        let from_album = self.get_owned_album(&from_album_id, &user_id).await?;
        let to_album = self.get_owned_album(&to_album_id, &user_id).await?;

        if self
            .paths
            .exists(&from_album_id, &to_album_id, &user_id)
            .await?
        {
            return Err(DomainError::DuplicatePath.into());
        }

        let path = TravelPath {
            path_id: PathId::generate(),
            user_id,
            from_album_id,
            to_album_id,
            created_at: Utc::now(),
        };
        self.paths.create(&path).await?;

        tracing::info!(path_id = %path.path_id, "Path created");
        Ok(PathWithAlbums {
            path,
            from_album,
            to_album,
        })
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<PathWithAlbums>, ApplicationError> {
        let paths = self.paths.list_by_user(&user_id).await?;

        let mut resolved = Vec::with_capacity(paths.len());
        for path in paths {
            let from_album = self.get_owned_album(&path.from_album_id, &user_id).await?;
            let to_album = self.get_owned_album(&path.to_album_id, &user_id).await?;
            resolved.push(PathWithAlbums {
                path,
                from_album,
                to_album,
            });
        }
        Ok(resolved)
    }

    pub async fn get(
        &self,
        path_id: PathId,
        user_id: UserId,
    ) -> Result<PathWithAlbums, ApplicationError> {
        let path = self
            .paths
            .find_by_id(&path_id)
            .await?
            .ok_or_else(|| DomainError::PathNotFound {
                id: path_id.to_string(),
            })?;
        if path.user_id != user_id {
            return Err(DomainError::AccessDenied { resource: "path" }.into());
        }

        let from_album = self.get_owned_album(&path.from_album_id, &user_id).await?;
        let to_album = self.get_owned_album(&path.to_album_id, &user_id).await?;
        Ok(PathWithAlbums {
            path,
            from_album,
            to_album,
        })
    }

    pub async fn delete(&self, path_id: PathId, user_id: UserId) -> Result<(), ApplicationError> {
        self.get(path_id, user_id).await?;
        self.paths.delete(&path_id, &user_id).await?;
        tracing::info!(path_id = %path_id, "Path deleted");
        Ok(())
    }

    /// Replace the single outgoing path of an album. Any existing outgoing
    /// path is removed first, then the new one is created.
    pub async fn set_next_destination(
        &self,
        user_id: UserId,
        from_album_id: AlbumId,
        to_album_id: AlbumId,
    ) -> Result<PathWithAlbums, ApplicationError> {
        self.get_owned_album(&from_album_id, &user_id).await?;
        self.paths
            .delete_by_from_album(&from_album_id, &user_id)
            .await?;
        self.create(user_id, from_album_id, to_album_id).await
    }

    /// The destination album this album points at, if any.
    pub async fn next_destination(
        &self,
        from_album_id: AlbumId,
        user_id: UserId,
    ) -> Result<Option<Album>, ApplicationError> {
        self.get_owned_album(&from_album_id, &user_id).await?;

        match self
            .paths
            .find_by_from_album(&from_album_id, &user_id)
            .await?
        {
            Some(path) => {
                let to_album = self.get_owned_album(&path.to_album_id, &user_id).await?;
                Ok(Some(to_album))
            }
            None => Ok(None),
        }
    }

    pub async fn remove_next_destination(
        &self,
        from_album_id: AlbumId,
        user_id: UserId,
    ) -> Result<(), ApplicationError> {
        self.get_owned_album(&from_album_id, &user_id).await?;
        self.paths
            .delete_by_from_album(&from_album_id, &user_id)
            .await?;
        Ok(())
    }
}
