//! Fixed en/tr strings for terminal output.

use chrono::Weekday;
use weathervane_core::{Language, Suggestion};

#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub loading: &'static str,
    pub no_data: &'static str,
    pub failed: &'static str,
    pub details: &'static str,
    pub wind: &'static str,
    pub direction: &'static str,
    pub humidity: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub feels_like: &'static str,
    pub pressure: &'static str,
    pub sunrise: &'static str,
    pub sunset: &'static str,
    pub forecast: &'static str,
    pub no_forecast: &'static str,
    pub search_prompt: &'static str,
    pub menu_search: &'static str,
    pub menu_language: &'static str,
    pub menu_theme: &'static str,
    pub menu_quit: &'static str,
    weekdays: [&'static str; 7],
    suggestions: [&'static str; 6],
}

const EN: Labels = Labels {
    loading: "Loading...",
    no_data: "No weather data yet. Search for a city.",
    failed: "Could not load weather",
    details: "Today's highlights",
    wind: "Wind",
    direction: "Direction",
    humidity: "Humidity",
    high: "High",
    low: "Low",
    feels_like: "Feels like",
    pressure: "Pressure",
    sunrise: "Sunrise",
    sunset: "Sunset",
    forecast: "5-day forecast",
    no_forecast: "Not available from this weather source.",
    search_prompt: "City",
    menu_search: "Search city",
    menu_language: "Türkçe",
    menu_theme: "Toggle theme",
    menu_quit: "Quit",
    weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    suggestions: [
        "Take an umbrella, it's raining.",
        "Dress warmly and watch out for ice.",
        "It's windy, hold on to your hat.",
        "Hot and sunny: sunscreen and water.",
        "Cold out, grab a jacket.",
        "Nice weather for a walk.",
    ],
};

const TR: Labels = Labels {
    loading: "Yükleniyor...",
    no_data: "Henüz hava durumu yok. Bir şehir arayın.",
    failed: "Hava durumu alınamadı",
    details: "Bugünün özeti",
    wind: "Rüzgar",
    direction: "Yön",
    humidity: "Nem",
    high: "Yüksek",
    low: "Düşük",
    feels_like: "Hissedilen",
    pressure: "Basınç",
    sunrise: "Gün doğumu",
    sunset: "Gün batımı",
    forecast: "5 günlük tahmin",
    no_forecast: "Bu hava durumu kaynağı tahmin sunmuyor.",
    search_prompt: "Şehir",
    menu_search: "Şehir ara",
    menu_language: "English",
    menu_theme: "Temayı değiştir",
    menu_quit: "Çıkış",
    weekdays: ["Pzt", "Sal", "Çar", "Per", "Cum", "Cmt", "Paz"],
    suggestions: [
        "Şemsiyeni al, yağmur yağıyor.",
        "Sıkı giyin, buzlanmaya dikkat et.",
        "Rüzgarlı bir gün, şapkana sahip çık.",
        "Sıcak ve güneşli: güneş kremi ve su.",
        "Hava soğuk, montunu al.",
        "Yürüyüş için güzel bir hava.",
    ],
};

impl Labels {
    pub fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::En => &EN,
            Language::Tr => &TR,
        }
    }

    pub fn weekday(&self, day: Weekday) -> &'static str {
        self.weekdays[day.num_days_from_monday() as usize]
    }

    pub fn suggestion(&self, suggestion: Suggestion) -> &'static str {
        let idx = match suggestion {
            Suggestion::Rain => 0,
            Suggestion::Snow => 1,
            Suggestion::Wind => 2,
            Suggestion::Sunny => 3,
            Suggestion::Cold => 4,
            Suggestion::Good => 5,
        };
        self.suggestions[idx]
    }
}
