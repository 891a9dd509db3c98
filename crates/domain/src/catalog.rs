//! # 商品カタログ
//!
//! 販売中のモーターサイクルの静的な商品レコードと、その読み取り専用の参照口を定義する。
//! お問い合わせでは商品参照の照合と通知メールの表示名補完にのみ使う。

use serde::Serialize;

/// 商品レコード
///
/// JSON では仕様項目を平坦化して出力する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// 商品識別子（例: `"QS125-8"`）
    pub id:       &'static str,
    /// 表示名
    pub name:     &'static str,
    /// サブタイトル
    pub subtitle: &'static str,
    #[serde(flatten)]
    pub specs:    ProductSpecs,
}

impl CatalogEntry {
    /// 通知メール向けの表示ラベル（`"<表示名> (<識別子>)"`）
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

/// 仕様項目
///
/// 値は単位込みの表示用文字列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSpecs {
    pub engine:           &'static str,
    pub power:            &'static str,
    pub torque:           &'static str,
    pub max_speed:        &'static str,
    pub fuel_consumption: &'static str,
    pub weight:           &'static str,
    pub max_load:         &'static str,
    pub dimensions:       &'static str,
    pub wheelbase:        &'static str,
    pub brake_type:       &'static str,
    pub fuel_capacity:    &'static str,
    pub starter:          &'static str,
    pub tires:            &'static str,
    /// 40 フィートコンテナあたりの積載台数
    pub container_qty:    &'static str,
    /// ボア × ストローク
    pub bore:             &'static str,
}

/// 商品カタログの参照
pub trait ProductCatalog: Send + Sync {
    /// 識別子で商品を引く（大文字小文字は区別しない）
    fn find(&self, id: &str) -> Option<&CatalogEntry>;

    /// 全商品を掲載順で返す
    fn entries(&self) -> &[CatalogEntry];
}

/// 静的配列によるカタログ
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

/// 125 cm³ 系モデルの共通仕様
const MOTO_125: ProductSpecs = ProductSpecs {
    engine:           "Monocylindre 4 temps, refroidi par air, 125 cm³",
    power:            "6,8 kW / 8 500 tr/min",
    torque:           "8,5 N·m / 7 000 tr/min",
    max_speed:        "90 km/h",
    fuel_consumption: "2,2 L/100 km",
    weight:           "110 kg",
    max_load:         "150 kg",
    dimensions:       "1 980 × 760 × 1 080 mm",
    wheelbase:        "1 270 mm",
    brake_type:       "Disque avant / tambour arrière",
    fuel_capacity:    "12 L",
    starter:          "Électrique et kick",
    tires:            "2.75-18 / 3.00-18",
    container_qty:    "105 unités (40 HQ)",
    bore:             "56,5 × 49,5 mm",
};

const BUILTIN_ENTRIES: [CatalogEntry; 6] = [
    CatalogEntry {
        id:       "QS125-8",
        name:     "QS125-8",
        subtitle: "Moto 125 cm³",
        specs:    MOTO_125,
    },
    CatalogEntry {
        id:       "DFK-QS150ZH",
        name:     "DFK QS150ZH",
        subtitle: "Tricycle cargo 150 cm³",
        specs:    ProductSpecs {
            engine:           "Monocylindre 4 temps, refroidi par eau, 150 cm³",
            power:            "8,2 kW / 8 000 tr/min",
            torque:           "10,5 N·m / 6 500 tr/min",
            max_speed:        "60 km/h",
            fuel_consumption: "3,5 L/100 km",
            weight:           "320 kg",
            max_load:         "1 000 kg",
            dimensions:       "3 600 × 1 350 × 1 400 mm",
            wheelbase:        "2 400 mm",
            brake_type:       "Tambour avant et arrière",
            fuel_capacity:    "14 L",
            starter:          "Électrique et kick",
            tires:            "4.00-12 / 4.50-12",
            container_qty:    "16 unités (40 HQ)",
            bore:             "62 × 49,5 mm",
        },
    },
    CatalogEntry {
        id:       "QS125-8A",
        name:     "QS125-8A",
        subtitle: "Moto 125 cm³",
        specs:    ProductSpecs {
            brake_type: "Disque avant et arrière",
            tires: "2.75-17 / 3.00-17",
            ..MOTO_125
        },
    },
    CatalogEntry {
        id:       "QS50-3",
        name:     "QS50-3",
        subtitle: "Scooter 50 cm³",
        specs:    ProductSpecs {
            engine:           "Monocylindre 4 temps, refroidi par air, 49,5 cm³",
            power:            "2,2 kW / 7 500 tr/min",
            torque:           "3,0 N·m / 6 500 tr/min",
            max_speed:        "45 km/h",
            fuel_consumption: "1,8 L/100 km",
            weight:           "78 kg",
            max_load:         "120 kg",
            dimensions:       "1 760 × 680 × 1 100 mm",
            wheelbase:        "1 250 mm",
            brake_type:       "Tambour avant et arrière",
            fuel_capacity:    "5 L",
            starter:          "Électrique et kick",
            tires:            "3.50-10 / 3.50-10",
            container_qty:    "120 unités (40 HQ)",
            bore:             "39 × 41,4 mm",
        },
    },
    CatalogEntry {
        id:       "QS125-10",
        name:     "QS125-10",
        subtitle: "Moto 125 cm³",
        specs:    ProductSpecs {
            max_speed: "95 km/h",
            weight: "115 kg",
            fuel_capacity: "14 L",
            ..MOTO_125
        },
    },
    CatalogEntry {
        id:       "QS125-30",
        name:     "QS125-30",
        subtitle: "Moto 125 cm³",
        specs:    ProductSpecs {
            weight: "118 kg",
            max_load: "180 kg",
            dimensions: "2 010 × 780 × 1 100 mm",
            starter: "Électrique",
            ..MOTO_125
        },
    },
];

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// 販売中の全モデルを収録したカタログ
    pub fn builtin() -> Self {
        Self::new(BUILTIN_ENTRIES.to_vec())
    }
}

impl ProductCatalog for StaticCatalog {
    fn find(&self, id: &str) -> Option<&CatalogEntry> {
        let id = id.trim();
        self.entries.iter().find(|e| e.id.eq_ignore_ascii_case(id))
    }

    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}
