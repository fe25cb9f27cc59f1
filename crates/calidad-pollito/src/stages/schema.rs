//! Worksheet names and column layouts.
//!
//! Column sets drifted between field revisions of the method, so the layout
//! is data: the store, record builders, dashboard, and export all resolve
//! columns through a [`SchemaSet`] instead of assuming positions.

use serde::Serialize;

/// The eight persisted tables, one per external worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableId {
    EggReception,
    HatcherySummary,
    HatcheryDetail,
    Transport,
    FarmSummary,
    FarmDetail,
    SevenDaySummary,
    SevenDayDetail,
}

impl TableId {
    pub const fn worksheet_name(self) -> &'static str {
        match self {
            TableId::EggReception => "Huevo_Recepcion",
            TableId::HatcherySummary => "Lotes_Resumen",
            TableId::HatcheryDetail => "Pollitos_Detalle",
            TableId::Transport => "Transporte_Evaluacion",
            TableId::FarmSummary => "Granja_Evaluacion",
            TableId::FarmDetail => "Granja_Detalle_Calidad",
            TableId::SevenDaySummary => "Seguimiento_7_Dias_Resumen",
            TableId::SevenDayDetail => "Seguimiento_7_Dias_Detalle",
        }
    }

    pub const fn all() -> [TableId; 8] {
        [
            TableId::EggReception,
            TableId::HatcherySummary,
            TableId::HatcheryDetail,
            TableId::Transport,
            TableId::FarmSummary,
            TableId::FarmDetail,
            TableId::SevenDaySummary,
            TableId::SevenDayDetail,
        ]
    }
}

/// Column layout of one table, in append order.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub table: TableId,
    pub columns: &'static [&'static str],
}

impl TableSchema {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| *column == name)
    }
}

const DETAIL_COLUMNS: &[&str] = &[
    "lote_id",
    "numero_pollito",
    "vitalidad_ok",
    "ombligo_ok",
    "patas_ok",
    "ojos_ok",
    "pico_ok",
    "abdomen_ok",
    "plumon_ok",
    "cuello_ok",
    "peso_gr",
    "temp_cloacal",
];

/// The full set of table layouts for one revision of the method.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    schemas: Vec<TableSchema>,
}

impl SchemaSet {
    /// Latest-revision layout. Summary tables carry a trailing
    /// `schema_version` so historical rows stay interpretable after the
    /// rubric changes again.
    pub fn latest() -> Self {
        let schemas = vec![
            TableSchema {
                table: TableId::EggReception,
                columns: &[
                    "lote_id",
                    "granja_origen",
                    "edad_reproductora_semanas",
                    "fecha_recepcion",
                    "temp_camion",
                    "minutos_espera",
                    "pct_sucios",
                    "pct_fisurados",
                    "peso_promedio_huevo_gr",
                    "cv_peso_pct",
                    "schema_version",
                ],
            },
            TableSchema {
                table: TableId::HatcherySummary,
                columns: &[
                    "lote_id",
                    "granja_origen",
                    "linea_genetica",
                    "fecha_nacimiento",
                    "cantidad_total",
                    "evaluador",
                    "temp_furgon",
                    "temp_cascara",
                    "temp_salon",
                    "huevo_sudado",
                    "aves_por_caja",
                    "temp_cloacal_promedio",
                    "puntuacion_final",
                    "uniformidad_pct",
                    "cv_peso_pct",
                    "schema_version",
                ],
            },
            TableSchema {
                table: TableId::HatcheryDetail,
                columns: DETAIL_COLUMNS,
            },
            TableSchema {
                table: TableId::Transport,
                columns: &[
                    "lote_id",
                    "fecha",
                    "placa",
                    "conductor",
                    "hora_salida",
                    "hora_llegada",
                    "duracion_minutos",
                    "temp_inicio",
                    "humedad_inicio_pct",
                    "temp_fin",
                    "humedad_fin_pct",
                    "comportamiento_llegada",
                    "mortalidad",
                    "schema_version",
                ],
            },
            TableSchema {
                table: TableId::FarmSummary,
                columns: &[
                    "lote_id",
                    "fecha_recepcion",
                    "evaluador",
                    "temp_ambiente",
                    "humedad_relativa_pct",
                    "temp_cama",
                    "pct_buche_lleno",
                    "cv_temp_pct",
                    "cv_peso_pct",
                    "puntuacion_final",
                    "schema_version",
                ],
            },
            TableSchema {
                table: TableId::FarmDetail,
                columns: DETAIL_COLUMNS,
            },
            TableSchema {
                table: TableId::SevenDaySummary,
                columns: &[
                    "lote_id",
                    "fecha",
                    "peso_promedio_7d_gr",
                    "cv_peso_pct",
                    "ganancia_diaria_gr",
                    "factor_crecimiento",
                    "mortalidad",
                    "mortalidad_pct",
                    "schema_version",
                ],
            },
            TableSchema {
                table: TableId::SevenDayDetail,
                columns: &["lote_id", "numero_pollito", "peso_gr"],
            },
        ];

        Self { schemas }
    }

    pub fn schema(&self, table: TableId) -> &TableSchema {
        self.schemas
            .iter()
            .find(|schema| schema.table == table)
            .expect("schema defined for every table")
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.schemas.iter()
    }
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self::latest()
    }
}
