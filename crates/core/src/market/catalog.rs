use crate::domain::suggestion::SuggestionEntry;

/// Large and mid cap NSE listings used when live lookups miss or fail.
const NSE_LISTINGS: &[(&str, &str)] = &[
    ("RELIANCE.NS", "Reliance Industries Ltd"),
    ("TCS.NS", "Tata Consultancy Services Ltd"),
    ("HDFCBANK.NS", "HDFC Bank Ltd"),
    ("ICICIBANK.NS", "ICICI Bank Ltd"),
    ("SBIN.NS", "State Bank of India"),
    ("INFY.NS", "Infosys Ltd"),
    ("HINDUNILVR.NS", "Hindustan Unilever Ltd"),
    ("ITC.NS", "ITC Ltd"),
    ("KOTAKBANK.NS", "Kotak Mahindra Bank Ltd"),
    ("AXISBANK.NS", "Axis Bank Ltd"),
    ("LT.NS", "Larsen & Toubro Ltd"),
    ("WIPRO.NS", "Wipro Ltd"),
    ("MARUTI.NS", "Maruti Suzuki India Ltd"),
    ("BAJFINANCE.NS", "Bajaj Finance Ltd"),
    ("HCLTECH.NS", "HCL Technologies Ltd"),
    ("ASIANPAINT.NS", "Asian Paints Ltd"),
    ("BHARTIARTL.NS", "Bharti Airtel Ltd"),
    ("SUNPHARMA.NS", "Sun Pharmaceutical Industries Ltd"),
    ("TITAN.NS", "Titan Company Ltd"),
    ("ULTRACEMCO.NS", "UltraTech Cement Ltd"),
    ("NESTLEIND.NS", "Nestle India Ltd"),
    ("POWERGRID.NS", "Power Grid Corporation of India Ltd"),
    ("NTPC.NS", "NTPC Ltd"),
    ("ONGC.NS", "Oil and Natural Gas Corporation Ltd"),
    ("TATASTEEL.NS", "Tata Steel Ltd"),
    ("TECHM.NS", "Tech Mahindra Ltd"),
    ("JSWSTEEL.NS", "JSW Steel Ltd"),
    ("INDUSINDBK.NS", "IndusInd Bank Ltd"),
    ("DRREDDY.NS", "Dr. Reddy's Laboratories Ltd"),
    ("CIPLA.NS", "Cipla Ltd"),
    ("ADANIPORTS.NS", "Adani Ports and SEZ Ltd"),
    ("ADANIGREEN.NS", "Adani Green Energy Ltd"),
    ("BAJAJ-AUTO.NS", "Bajaj Auto Ltd"),
    ("BPCL.NS", "Bharat Petroleum Corporation Ltd"),
    ("COALINDIA.NS", "Coal India Ltd"),
    ("DIVISLAB.NS", "Divi's Laboratories Ltd"),
    ("EICHERMOT.NS", "Eicher Motors Ltd"),
    ("GRASIM.NS", "Grasim Industries Ltd"),
    ("HDFCLIFE.NS", "HDFC Life Insurance Company Ltd"),
    ("HEROMOTOCO.NS", "Hero MotoCorp Ltd"),
    ("HINDALCO.NS", "Hindalco Industries Ltd"),
    ("IOC.NS", "Indian Oil Corporation Ltd"),
    ("M&M.NS", "Mahindra & Mahindra Ltd"),
    ("SBILIFE.NS", "SBI Life Insurance Company Ltd"),
    ("TATACONSUM.NS", "Tata Consumer Products Ltd"),
    ("TATAMOTORS.NS", "Tata Motors Ltd"),
    ("UPL.NS", "UPL Ltd"),
    ("VEDL.NS", "Vedanta Ltd"),
    ("APOLLOHOSP.NS", "Apollo Hospitals Enterprise Ltd"),
    ("BRITANNIA.NS", "Britannia Industries Ltd"),
    ("DABUR.NS", "Dabur India Ltd"),
    ("GODREJCP.NS", "Godrej Consumer Products Ltd"),
    ("MARICO.NS", "Marico Ltd"),
    ("PIDILITIND.NS", "Pidilite Industries Ltd"),
    ("DMART.NS", "Avenue Supermarts Limited"),
    ("BANDHANBNK.NS", "Bandhan Bank Ltd"),
    ("FEDERALBNK.NS", "Federal Bank Ltd"),
    ("IDFCFIRSTB.NS", "IDFC First Bank Ltd"),
    ("PNB.NS", "Punjab National Bank"),
    ("CANBK.NS", "Canara Bank"),
    ("BANKBARODA.NS", "Bank of Baroda"),
    ("YESBANK.NS", "Yes Bank Ltd"),
    ("MINDTREE.NS", "Mindtree Ltd"),
    ("MPHASIS.NS", "Mphasis Ltd"),
    ("LTI.NS", "L&T Infotech Ltd"),
    ("COFORGE.NS", "Coforge Ltd"),
    ("ASHOKLEY.NS", "Ashok Leyland Ltd"),
    ("TVSMOTOR.NS", "TVS Motor Company Ltd"),
    ("BAJAJFINSV.NS", "Bajaj Finserv Ltd"),
    ("LUPIN.NS", "Lupin Ltd"),
    ("BIOCON.NS", "Biocon Ltd"),
    ("CADILAHC.NS", "Cadila Healthcare Ltd"),
    ("TORNTPHARM.NS", "Torrent Pharmaceuticals Ltd"),
    ("COLPAL.NS", "Colgate Palmolive India Ltd"),
    ("JUBLFOOD.NS", "Jubilant FoodWorks Ltd"),
    ("ZEEL.NS", "Zee Entertainment Enterprises Ltd"),
    ("SAIL.NS", "Steel Authority of India Ltd"),
    ("GMRINFRA.NS", "GMR Infrastructure Ltd"),
    ("RPOWER.NS", "Reliance Power Ltd"),
    ("SUZLON.NS", "Suzlon Energy Ltd"),
    ("FORCEMOT.NS", "Force Motors Ltd"),
];

/// Catalog entries matching an already upper-cased query, in catalog order.
///
/// A listing matches when the query is contained in its symbol or name, or when any word
/// of the name starts with the query.
pub fn lookup(query_upper: &str) -> Vec<SuggestionEntry> {
    NSE_LISTINGS
        .iter()
        .filter(|(symbol, name)| {
            let name = name.to_uppercase();
            symbol.to_uppercase().contains(query_upper)
                || name.contains(query_upper)
                || name.split_whitespace().any(|w| w.starts_with(query_upper))
        })
        .map(|(symbol, name)| SuggestionEntry::new(*symbol, *name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_symbol_substring() {
        let out = lookup("RELI");
        assert_eq!(out[0].symbol, "RELIANCE.NS");
        assert!(out.iter().any(|e| e.symbol == "RPOWER.NS"));
    }

    #[test]
    fn matches_name_words() {
        let out = lookup("INFOSYS");
        assert_eq!(out, vec![SuggestionEntry::new("INFY.NS", "Infosys Ltd")]);
    }

    #[test]
    fn ampersand_symbols_are_searchable() {
        assert!(lookup("M&M").iter().any(|e| e.name == "Mahindra & Mahindra Ltd"));
    }

    #[test]
    fn no_match_is_empty() {
        assert!(lookup("QQQQQ").is_empty());
    }
}
