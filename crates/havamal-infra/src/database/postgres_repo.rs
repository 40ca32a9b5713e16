//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, QueryFilter, QueryOrder, Select,
};
use uuid::Uuid;

use havamal_core::domain::{
    Category, NavigationItem, NavigationLink, Post, PostCategory, PostDetail, PostVersion, User,
    join_details, mask_email,
};
use havamal_core::error::RepoError;
use havamal_core::ports::{
    BaseRepository, CategoryRepository, NavigationRepository, PostCategoryRepository, PostFilter,
    PostRepository, PostVersionRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::navigation::{self, Entity as NavigationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_category::{self, Entity as PostCategoryEntity};
use super::entity::post_version::{self, Entity as PostVersionEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// Ids bound per `IN` list. PostgreSQL caps a statement at 65535 parameters.
pub(crate) const IN_LIST_CHUNK: usize = 10_000;

/// Runs `base` once per chunk of distinct `ids`, filtered on `column`.
pub(crate) async fn find_in<E: EntityTrait>(
    db: &DbConn,
    base: Select<E>,
    column: E::Column,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<Vec<E::Model>, RepoError> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    let mut rows = Vec::new();
    for chunk in ids.chunks(IN_LIST_CHUNK) {
        let batch = base
            .clone()
            .filter(column.is_in(chunk.iter().copied()))
            .all(db)
            .await
            .map_err(map_db_err)?;
        rows.extend(batch);
    }
    Ok(rows)
}

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post version repository.
pub type PostgresPostVersionRepository = PostgresBaseRepository<PostVersionEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_details(&self, filter: PostFilter) -> Result<Vec<PostDetail>, RepoError> {
        let mut query = PostEntity::find();
        let mut scope: Option<Vec<Uuid>> = None;

        match &filter {
            PostFilter::All => {}
            PostFilter::Id(id) => query = query.filter(post::Column::Id.eq(*id)),
            PostFilter::Published => {
                query = query.filter(post::Column::Status.eq(post::Status::Published))
            }
            PostFilter::Author(id) => query = query.filter(post::Column::AuthorId.eq(*id)),
            PostFilter::Slug(slug) => query = query.filter(post::Column::Slug.eq(slug.as_str())),
            PostFilter::Category(key) => {
                let key = key.trim();
                let matched = CategoryEntity::find()
                    .filter(
                        Condition::any()
                            .add(category::Column::Slug.eq(key))
                            .add_option(
                                Uuid::parse_str(key).ok().map(|id| category::Column::Id.eq(id)),
                            ),
                    )
                    .all(&self.db)
                    .await
                    .map_err(map_db_err)?;

                if matched.is_empty() {
                    return Ok(Vec::new());
                }
                scope = Some(matched.into_iter().map(|c| c.id).collect());
            }
        }

        let posts: Vec<Post> = query
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(Into::into)
            .collect();
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut link_query = PostCategoryEntity::find();
        if let Some(ids) = scope {
            link_query = link_query.filter(post_category::Column::CategoryId.is_in(ids));
        }
        let links: Vec<PostCategory> = find_in(
            &self.db,
            link_query,
            post_category::Column::PostId,
            posts.iter().map(|p| p.id),
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let categories: Vec<Category> = find_in(
            &self.db,
            CategoryEntity::find(),
            category::Column::Id,
            links.iter().map(|l| l.category_id),
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        let users: Vec<User> = find_in(
            &self.db,
            UserEntity::find(),
            user::Column::Id,
            posts.iter().map(|p| p.author_id),
        )
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        Ok(join_details(&posts, &links, &categories, &users))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostVersionRepository for PostgresPostVersionRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostVersion>, RepoError> {
        let result = PostVersionEntity::find()
            .filter(post_version::Column::PostId.eq(post_id))
            .order_by_asc(post_version::Column::VersionNumber)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let result = PostVersionEntity::delete_many()
            .filter(post_version::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}

/// PostgreSQL post/category association repository.
pub struct PostgresPostCategoryRepository {
    db: DbConn,
}

impl PostgresPostCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostCategoryRepository for PostgresPostCategoryRepository {
    async fn add(&self, link: PostCategory) -> Result<(), RepoError> {
        PostCategoryEntity::insert(post_category::ActiveModel::from(link))
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn remove(&self, link: PostCategory) -> Result<(), RepoError> {
        let result = PostCategoryEntity::delete_many()
            .filter(post_category::Column::PostId.eq(link.post_id))
            .filter(post_category::Column::CategoryId.eq(link.category_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostCategory>, RepoError> {
        let result = PostCategoryEntity::find()
            .filter(post_category::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn remove_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let result = PostCategoryEntity::delete_many()
            .filter(post_category::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    async fn remove_for_category(&self, category_id: Uuid) -> Result<u64, RepoError> {
        let result = PostCategoryEntity::delete_many()
            .filter(post_category::Column::CategoryId.eq(category_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}

/// PostgreSQL navigation repository. Rows convert fallibly, so it does not
/// go through the generic base.
pub struct PostgresNavigationRepository {
    db: DbConn,
}

impl PostgresNavigationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<NavigationItem, Uuid> for PostgresNavigationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<NavigationItem>, RepoError> {
        NavigationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(NavigationItem::try_from)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<NavigationItem>, RepoError> {
        NavigationEntity::find()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(NavigationItem::try_from)
            .collect()
    }

    async fn insert(&self, entity: NavigationItem) -> Result<NavigationItem, RepoError> {
        let model = navigation::ActiveModel::from(entity)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        NavigationItem::try_from(model)
    }

    async fn update(&self, entity: NavigationItem) -> Result<NavigationItem, RepoError> {
        let model = navigation::ActiveModel::from(entity)
            .update(&self.db)
            .await
            .map_err(map_db_err)?;

        NavigationItem::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = NavigationEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl NavigationRepository for PostgresNavigationRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<NavigationItem>, RepoError> {
        NavigationEntity::find()
            .filter(navigation::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(NavigationItem::try_from)
            .transpose()
    }

    async fn find_by_link(&self, link: NavigationLink) -> Result<Vec<NavigationItem>, RepoError> {
        let condition = match link {
            NavigationLink::Custom => {
                navigation::Column::LinkSource.eq(navigation::Source::Custom)
            }
            NavigationLink::Category(id) => navigation::Column::CategoryId.eq(id),
            NavigationLink::Post(id) => navigation::Column::PostId.eq(id),
        };

        NavigationEntity::find()
            .filter(condition)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(NavigationItem::try_from)
            .collect()
    }
}
