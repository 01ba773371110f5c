//! Tag enums shared across the engine.
//!
//! Every enum here is persisted as its snake_case tag string (see the
//! per-variant `as_str` values) and parsed back via `FromStr`.  The search
//! engine treats all travel modes uniformly; only the transfer synthesizer
//! dispatches on mode.

use std::str::FromStr;

use crate::error::CoreError;

/// Generate `as_str`, `FromStr`, and `Display` for a tag enum.
macro_rules! tag_enum {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $( $(#[$vattr:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        $vis enum $name {
            $( $(#[$vattr])* $variant ),+
        }

        impl $name {
            /// The persisted tag string.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $tag ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $tag => Ok($name::$variant), )+
                    _ => Err(CoreError::UnknownTag {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum! {
    /// The means of traversing one structural edge.
    pub enum TravelMode : "travel mode" {
        Flight    => "flight",
        Train     => "train",
        Bus       => "bus",
        Rideshare => "rideshare",
        Walk      => "walk",
        Metro     => "metro",
        Tram      => "tram",
        Shuttle   => "shuttle",
    }
}

tag_enum! {
    /// What a routable point physically is.
    pub enum NodeKind : "node kind" {
        Airport     => "airport",
        Station     => "station",
        BusTerminal => "bus_terminal",
        Hotel       => "hotel",
        Address     => "address",
        Area        => "area",
        Poi         => "poi",
    }
}

tag_enum! {
    /// Granularity tag on a geographic [`Area`](crate::place::Area).
    pub enum AreaKind : "area kind" {
        City             => "city",
        Metro            => "metro",
        Neighborhood     => "neighborhood",
        AirportCatchment => "airport_catchment",
        Other            => "other",
    }
}

tag_enum! {
    /// Where an offer's price/time came from.
    pub enum OfferSource : "offer source" {
        ApiLive        => "api_live",
        Cached         => "cached",
        ManualStatic   => "manual_static",
        EstimatedModel => "estimated_model",
    }
}

tag_enum! {
    /// Whether an edge is a fixed route shape or a synthesis template.
    pub enum EdgeStructure : "edge structure" {
        Static          => "static",
        DynamicTemplate => "dynamic_template",
    }
}

tag_enum! {
    /// Terminal status of a search, carried on the itinerary bundle.
    ///
    /// `NoFeasibleRoute` and budget exhaustion are normal outcomes, not
    /// errors; fatal failures propagate as error types instead.
    pub enum SearchStatus : "search status" {
        Ok                  => "OK",
        TimeBudgetExhausted => "TIME_BUDGET_EXHAUSTED",
        NoFeasibleRoute     => "NO_FEASIBLE_ROUTE",
    }
}
