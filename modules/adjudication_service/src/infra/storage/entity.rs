//! SeaORM entities for database tables
//!
//! Table and column names are kept in Spanish, matching the campaign
//! datasets they are loaded from.

/// Networks (redes)
pub mod red {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "redes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub nombre: String,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::ipress::Entity")]
        Ipress,
    }

    impl Related<super::ipress::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Ipress.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Healthcare facilities (IPRESS)
pub mod ipress {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "ipress")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub nombre: String,
        pub red_id: i32,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::red::Entity",
            from = "Column::RedId",
            to = "super::red::Column::Id"
        )]
        Red,
        #[sea_orm(has_many = "super::plaza::Entity")]
        Plaza,
    }

    impl Related<super::red::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Red.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Occupational groups
pub mod grupo_ocupacional {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "grupos_ocupacionales")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub nombre: String,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::plaza::Entity")]
        Plaza,
        #[sea_orm(has_many = "super::postulante::Entity")]
        Postulante,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Positions (plazas)
pub mod plaza {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "plazas")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub ipress_id: i32,
        pub grupo_ocupacional_id: i32,
        pub subunidad: Option<String>,
        pub especialidad: Option<String>,
        pub total: i32,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::ipress::Entity",
            from = "Column::IpressId",
            to = "super::ipress::Column::Id"
        )]
        Ipress,
        #[sea_orm(
            belongs_to = "super::grupo_ocupacional::Entity",
            from = "Column::GrupoOcupacionalId",
            to = "super::grupo_ocupacional::Column::Id"
        )]
        GrupoOcupacional,
        #[sea_orm(has_many = "super::adjudicacion::Entity")]
        Adjudicacion,
    }

    impl Related<super::ipress::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Ipress.def()
        }
    }

    impl Related<super::grupo_ocupacional::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::GrupoOcupacional.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Candidates (postulantes)
pub mod postulante {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "postulantes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub orden_merito: i32,
        pub apellidos_nombres: String,
        #[sea_orm(unique)]
        pub dni: Option<String>,
        pub grupo_ocupacional_id: i32,
        pub especialidad: Option<String>,
        pub tiempo_servicio_anios: Option<i32>,
        pub tiempo_servicio_meses: Option<i32>,
        pub tiempo_servicio_dias: Option<i32>,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::grupo_ocupacional::Entity",
            from = "Column::GrupoOcupacionalId",
            to = "super::grupo_ocupacional::Column::Id"
        )]
        GrupoOcupacional,
        #[sea_orm(has_one = "super::adjudicacion::Entity")]
        Adjudicacion,
    }

    impl Related<super::grupo_ocupacional::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::GrupoOcupacional.def()
        }
    }

    impl Related<super::adjudicacion::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Adjudicacion.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Assignment records (adjudicaciones), one per candidate
pub mod adjudicacion {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "adjudicaciones")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(unique)]
        pub postulante_id: i32,
        pub plaza_id: Option<i32>,
        pub estado: String,
        pub fecha_adjudicacion: Option<DateTimeUtc>,
        pub fecha_desistimiento: Option<DateTimeUtc>,
        pub observaciones: Option<String>,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::postulante::Entity",
            from = "Column::PostulanteId",
            to = "super::postulante::Column::Id"
        )]
        Postulante,
        #[sea_orm(
            belongs_to = "super::plaza::Entity",
            from = "Column::PlazaId",
            to = "super::plaza::Column::Id"
        )]
        Plaza,
    }

    impl Related<super::postulante::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Postulante.def()
        }
    }

    impl Related<super::plaza::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Plaza.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
