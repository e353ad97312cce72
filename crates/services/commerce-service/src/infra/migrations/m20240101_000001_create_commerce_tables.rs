//! Migration: Create catalog, order and user tables, and seed the roles.

use sea_orm_migration::prelude::*;

use domain::VALID_ROLES;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Name).string().not_null())
                    .col(ColumnDef::new(User::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(User::Phone).string().not_null())
                    .col(ColumnDef::new(User::BirthDate).date().null())
                    .col(ColumnDef::new(User::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Role::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Role::Authority).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserRole::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRole::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserRole::RoleId).big_integer().not_null())
                    .primary_key(Index::create().col(UserRole::UserId).col(UserRole::RoleId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_role_user")
                            .from(UserRole::Table, UserRole::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_role_role")
                            .from(UserRole::Table, UserRole::RoleId)
                            .to(Role::Table, Role::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Product::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Product::Name).string().not_null())
                    .col(ColumnDef::new(Product::Description).text().not_null())
                    .col(ColumnDef::new(Product::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Product::ImgUrl).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_name")
                    .table(Product::Table)
                    .col(Product::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductCategory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProductCategory::ProductId).big_integer().not_null())
                    .col(ColumnDef::new(ProductCategory::CategoryId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProductCategory::ProductId)
                            .col(ProductCategory::CategoryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category_product")
                            .from(ProductCategory::Table, ProductCategory::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category_category")
                            .from(ProductCategory::Table, ProductCategory::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Order::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Order::Moment)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Order::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Order::ClientId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_client")
                            .from(Order::Table, Order::ClientId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Deleting a product that an order item still references must fail
        manager
            .create_table(
                Table::create()
                    .table(OrderItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderItem::OrderId).big_integer().not_null())
                    .col(ColumnDef::new(OrderItem::ProductId).big_integer().not_null())
                    .col(ColumnDef::new(OrderItem::Quantity).integer().not_null())
                    .col(ColumnDef::new(OrderItem::Price).decimal_len(12, 2).not_null())
                    .primary_key(
                        Index::create()
                            .col(OrderItem::OrderId)
                            .col(OrderItem::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item_order")
                            .from(OrderItem::Table, OrderItem::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_item_product")
                            .from(OrderItem::Table, OrderItem::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        let mut seed_roles = Query::insert();
        seed_roles.into_table(Role::Table).columns([Role::Authority]);
        for authority in VALID_ROLES {
            seed_roles
                .values([(*authority).into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(seed_roles).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItem::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Order::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductCategory::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Product::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserRole::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Role::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "tb_user")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    BirthDate,
    Password,
}

#[derive(DeriveIden)]
enum Role {
    #[sea_orm(iden = "tb_role")]
    Table,
    Id,
    Authority,
}

#[derive(DeriveIden)]
enum UserRole {
    #[sea_orm(iden = "tb_user_role")]
    Table,
    UserId,
    RoleId,
}

#[derive(DeriveIden)]
enum Category {
    #[sea_orm(iden = "tb_category")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Product {
    #[sea_orm(iden = "tb_product")]
    Table,
    Id,
    Name,
    Description,
    Price,
    ImgUrl,
}

#[derive(DeriveIden)]
enum ProductCategory {
    #[sea_orm(iden = "tb_product_category")]
    Table,
    ProductId,
    CategoryId,
}

#[derive(DeriveIden)]
enum Order {
    #[sea_orm(iden = "tb_order")]
    Table,
    Id,
    Moment,
    Status,
    ClientId,
}

#[derive(DeriveIden)]
enum OrderItem {
    #[sea_orm(iden = "tb_order_item")]
    Table,
    OrderId,
    ProductId,
    Quantity,
    Price,
}
