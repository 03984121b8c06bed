//! Database migrations for the adjudication service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_catalogos::Migration),
            Box::new(m20250801_000002_create_plazas_postulantes::Migration),
            Box::new(m20250801_000003_create_adjudicaciones::Migration),
        ]
    }
}

fn timestamps(table: &mut TableCreateStatement, created: impl IntoIden, updated: impl IntoIden) {
    table
        .col(
            ColumnDef::new(created)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(updated)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        );
}

mod m20250801_000001_create_catalogos {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut redes = Table::create()
                .table(Redes::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Redes::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(Redes::Nombre)
                        .string()
                        .not_null()
                        .unique_key(),
                )
                .to_owned();
            timestamps(&mut redes, Redes::CreatedAt, Redes::UpdatedAt);
            manager.create_table(redes).await?;

            let mut ipress = Table::create()
                .table(Ipress::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Ipress::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Ipress::Nombre).string().not_null())
                .col(ColumnDef::new(Ipress::RedId).integer().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_ipress_red")
                        .from(Ipress::Table, Ipress::RedId)
                        .to(Redes::Table, Redes::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned();
            timestamps(&mut ipress, Ipress::CreatedAt, Ipress::UpdatedAt);
            manager.create_table(ipress).await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_ipress_red_nombre")
                        .table(Ipress::Table)
                        .col(Ipress::RedId)
                        .col(Ipress::Nombre)
                        .unique()
                        .to_owned(),
                )
                .await?;

            let mut grupos = Table::create()
                .table(GruposOcupacionales::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(GruposOcupacionales::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(GruposOcupacionales::Nombre)
                        .string()
                        .not_null()
                        .unique_key(),
                )
                .to_owned();
            timestamps(
                &mut grupos,
                GruposOcupacionales::CreatedAt,
                GruposOcupacionales::UpdatedAt,
            );
            manager.create_table(grupos).await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(GruposOcupacionales::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Ipress::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Redes::Table).to_owned())
                .await
        }
    }
}

mod m20250801_000002_create_plazas_postulantes {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut plazas = Table::create()
                .table(Plazas::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Plazas::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Plazas::IpressId).integer().not_null())
                .col(
                    ColumnDef::new(Plazas::GrupoOcupacionalId)
                        .integer()
                        .not_null(),
                )
                .col(ColumnDef::new(Plazas::Subunidad).string())
                .col(ColumnDef::new(Plazas::Especialidad).string())
                .col(ColumnDef::new(Plazas::Total).integer().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_plazas_ipress")
                        .from(Plazas::Table, Plazas::IpressId)
                        .to(Ipress::Table, Ipress::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_plazas_grupo")
                        .from(Plazas::Table, Plazas::GrupoOcupacionalId)
                        .to(GruposOcupacionales::Table, GruposOcupacionales::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned();
            timestamps(&mut plazas, Plazas::CreatedAt, Plazas::UpdatedAt);
            manager.create_table(plazas).await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_plazas_composicion")
                        .table(Plazas::Table)
                        .col(Plazas::IpressId)
                        .col(Plazas::GrupoOcupacionalId)
                        .col(Plazas::Subunidad)
                        .col(Plazas::Especialidad)
                        .unique()
                        .to_owned(),
                )
                .await?;

            let mut postulantes = Table::create()
                .table(Postulantes::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Postulantes::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Postulantes::OrdenMerito).integer().not_null())
                .col(
                    ColumnDef::new(Postulantes::ApellidosNombres)
                        .string()
                        .not_null(),
                )
                .col(ColumnDef::new(Postulantes::Dni).string().unique_key())
                .col(
                    ColumnDef::new(Postulantes::GrupoOcupacionalId)
                        .integer()
                        .not_null(),
                )
                .col(ColumnDef::new(Postulantes::Especialidad).string())
                .col(ColumnDef::new(Postulantes::TiempoServicioAnios).integer())
                .col(ColumnDef::new(Postulantes::TiempoServicioMeses).integer())
                .col(ColumnDef::new(Postulantes::TiempoServicioDias).integer())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_postulantes_grupo")
                        .from(Postulantes::Table, Postulantes::GrupoOcupacionalId)
                        .to(GruposOcupacionales::Table, GruposOcupacionales::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned();
            timestamps(
                &mut postulantes,
                Postulantes::CreatedAt,
                Postulantes::UpdatedAt,
            );
            manager.create_table(postulantes).await?;

            manager
                .create_index(
                    Index::create()
                        .name("uq_postulantes_grupo_merito")
                        .table(Postulantes::Table)
                        .col(Postulantes::GrupoOcupacionalId)
                        .col(Postulantes::OrdenMerito)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Postulantes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Plazas::Table).to_owned())
                .await
        }
    }
}

mod m20250801_000003_create_adjudicaciones {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut adjudicaciones = Table::create()
                .table(Adjudicaciones::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Adjudicaciones::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(Adjudicaciones::PostulanteId)
                        .integer()
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Adjudicaciones::PlazaId).integer())
                .col(
                    ColumnDef::new(Adjudicaciones::Estado)
                        .string()
                        .not_null()
                        .default("pendiente"),
                )
                .col(ColumnDef::new(Adjudicaciones::FechaAdjudicacion).timestamp_with_time_zone())
                .col(
                    ColumnDef::new(Adjudicaciones::FechaDesistimiento).timestamp_with_time_zone(),
                )
                .col(ColumnDef::new(Adjudicaciones::Observaciones).string())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_adjudicaciones_postulante")
                        .from(Adjudicaciones::Table, Adjudicaciones::PostulanteId)
                        .to(Postulantes::Table, Postulantes::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_adjudicaciones_plaza")
                        .from(Adjudicaciones::Table, Adjudicaciones::PlazaId)
                        .to(Plazas::Table, Plazas::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned();
            timestamps(
                &mut adjudicaciones,
                Adjudicaciones::CreatedAt,
                Adjudicaciones::UpdatedAt,
            );
            manager.create_table(adjudicaciones).await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_adjudicaciones_plaza")
                        .table(Adjudicaciones::Table)
                        .col(Adjudicaciones::PlazaId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_adjudicaciones_estado")
                        .table(Adjudicaciones::Table)
                        .col(Adjudicaciones::Estado)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Adjudicaciones::Table).to_owned())
                .await
        }
    }
}

#[derive(DeriveIden)]
enum Redes {
    Table,
    Id,
    Nombre,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Ipress {
    Table,
    Id,
    Nombre,
    RedId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GruposOcupacionales {
    Table,
    Id,
    Nombre,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Plazas {
    Table,
    Id,
    IpressId,
    GrupoOcupacionalId,
    Subunidad,
    Especialidad,
    Total,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Postulantes {
    Table,
    Id,
    OrdenMerito,
    ApellidosNombres,
    Dni,
    GrupoOcupacionalId,
    Especialidad,
    TiempoServicioAnios,
    TiempoServicioMeses,
    TiempoServicioDias,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Adjudicaciones {
    Table,
    Id,
    PostulanteId,
    PlazaId,
    Estado,
    FechaAdjudicacion,
    FechaDesistimiento,
    Observaciones,
    CreatedAt,
    UpdatedAt,
}
