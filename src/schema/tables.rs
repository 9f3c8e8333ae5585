//! Relation definitions, in creation order

use super::{Column, ColumnType, ForeignKey, TableSchema};

pub static PATIENTS: TableSchema = TableSchema {
    name: "Patients",
    columns: &[
        Column::varchar("PatientID").primary_key(),
        Column::varchar("Name_Pseudonym"),
        Column::new("Age", ColumnType::Int),
        Column::new("Gender", ColumnType::VarChar(50)),
        Column::new("Contact_Info", ColumnType::Text),
        Column::varchar("Dietary_Habits"),
        Column::varchar("Meal_Frequency_per_day"),
        Column::varchar("Bowel_Movements"),
        Column::varchar("Water_Intake_Liters"),
        Column::varchar("Physical_Activity_Level"),
        Column::varchar("Sleep_Patterns"),
        Column::varchar("Stress_Levels"),
        Column::new("Allergies", ColumnType::Text),
        Column::new("Comorbidities", ColumnType::Text),
        Column::varchar("Dosha_Prakriti_Assessment"),
    ],
    foreign_keys: &[],
};

pub static FOODS: TableSchema = TableSchema {
    name: "Foods",
    columns: &[
        Column::varchar("FoodID").primary_key(),
        Column::varchar("Food_Name_English"),
        Column::varchar("Food_Name_Local"),
        Column::varchar("Base_Item"),
        Column::varchar("Category"),
        Column::varchar("Cuisine"),
        Column::varchar("Scientific_Name"),
        Column::new("Description", ColumnType::Text),
        Column::varchar("Meal_Type"),
        Column::varchar("Serving_Size_g"),
        Column::varchar("Rasa"),
        Column::varchar("Virya"),
        Column::varchar("Vipaka"),
        Column::varchar("Guna"),
        Column::varchar("Digestibility"),
        Column::varchar("Dosha_Suitability"),
        Column::new("Allergen_Warnings", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static RECIPES: TableSchema = TableSchema {
    name: "Recipes",
    columns: &[
        Column::new("RecipeID", ColumnType::Integer).autoincrement(),
        Column::varchar("Recipe_Name").not_null(),
        Column::new("Ingredients", ColumnType::Text),
        Column::new("Cooking_Method", ColumnType::Text),
        Column::new("Total_Nutrition_per_Serving", ColumnType::Text),
        Column::varchar("Dosha_Suitability"),
    ],
    foreign_keys: &[],
};

pub static DIET_CHARTS: TableSchema = TableSchema {
    name: "DietCharts",
    columns: &[
        Column::new("ChartID", ColumnType::Integer).autoincrement(),
        Column::varchar("PatientID"),
        Column::new("DateCreated", ColumnType::DateTime).default_expr("CURRENT_TIMESTAMP"),
        Column::new("MealPlan", ColumnType::Text),
        Column::new("TotalDailyNutrition", ColumnType::Text),
        Column::new("AyurvedaComplianceNotes", ColumnType::Text),
        Column::new("ClinicalNotes", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey {
        column: "PatientID",
        references_table: "Patients",
        references_column: "PatientID",
    }],
};

// One row per meal item; (ChartID, Date, Meal_Time, Item_ID) is not a key
pub static DIET_CHART_MEALS: TableSchema = TableSchema {
    name: "DietChartMeals",
    columns: &[
        Column::new("ChartID", ColumnType::Integer),
        Column::varchar("PatientID"),
        Column::varchar("Date"),
        Column::varchar("Meal_Time"),
        Column::varchar("Item_Type"),
        Column::varchar("Item_ID"),
        Column::varchar("Item_Name"),
        Column::new("Quantity_g", ColumnType::Real),
        Column::new("Calories_kcal", ColumnType::Real),
        Column::new("Notes", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey {
            column: "ChartID",
            references_table: "DietCharts",
            references_column: "ChartID",
        },
        ForeignKey {
            column: "PatientID",
            references_table: "Patients",
            references_column: "PatientID",
        },
    ],
};

pub static ALL_TABLES: &[&TableSchema] = &[
    &PATIENTS,
    &FOODS,
    &RECIPES,
    &DIET_CHARTS,
    &DIET_CHART_MEALS,
];
