use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Listings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Listings::Title).string_len(50).not_null())
                    .col(ColumnDef::new(Listings::Price).big_integer().not_null())
                    .col(ColumnDef::new(Listings::Description).text())
                    .col(ColumnDef::new(Listings::ImageUrl).string())
                    .col(ColumnDef::new(Listings::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Listings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Listings::Table, Listings::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
    Title,
    Price,
    Description,
    ImageUrl,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
