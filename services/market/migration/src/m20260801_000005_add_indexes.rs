use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Listings::Table)
                    .col(Listings::OwnerId)
                    .name("idx_listings_owner_id")
                    .to_owned(),
            )
            .await?;
        // Both catalogs are served newest-first.
        manager
            .create_index(
                Index::create()
                    .table(Listings::Table)
                    .col(Listings::CreatedAt)
                    .name("idx_listings_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Reviews::Table)
                    .col(Reviews::ListingId)
                    .name("idx_reviews_listing_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Reviews::Table)
                    .col(Reviews::OwnerId)
                    .name("idx_reviews_owner_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_reviews_owner_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_listing_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_listings_created_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_listings_owner_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Listings {
    Table,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum Reviews {
    Table,
    ListingId,
    OwnerId,
}
